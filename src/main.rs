//! Line-oriented text runner (default binary).
//!
//! Reads one command per line from stdin and prints the board as plain text.
//! It drives the same session registry and leaderboard a chat front end
//! would, with a single local player.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use log::info;

use blockfall::core::GameSnapshot;
use blockfall::records::{PlayerMeta, RecordsStore};
use blockfall::types::GameAction;
use blockfall::{AppConfig, Finish, Player, SessionId, Sessions};

const LOCAL_SESSION: SessionId = 0;
const LOCAL_PLAYER: i64 = 0;

const HELP: &str = "commands: play, left, right, down, rotate, drop, end, top, stats, board, quit";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    info!(
        "records at {}, board {}x{}",
        config.records_file.display(),
        config.board.width,
        config.board.height
    );

    let store = Arc::new(RecordsStore::open_json(&config.records_file));
    let sessions = match config.seed {
        Some(seed) => Sessions::with_seed(store, config.board, seed),
        None => Sessions::new(store, config.board),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(sessions, &config, stdin.lock(), stdout.lock())
}

fn local_player() -> Player {
    let username = std::env::var("USER").unwrap_or_default();
    Player::new(LOCAL_PLAYER, PlayerMeta::new(username, ""))
}

fn run(
    mut sessions: Sessions,
    config: &AppConfig,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    let player = local_player();
    writeln!(out, "{}", HELP)?;

    for line in input.lines() {
        let line = line?;
        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        match command {
            "quit" | "exit" => break,
            "play" | "start" => {
                let snapshot = sessions.start(LOCAL_SESSION)?;
                write_snapshot(&mut out, &snapshot)?;
            }
            "end" => match sessions.end(LOCAL_SESSION, &player) {
                Some(finish) => write_finish(&mut out, &finish)?,
                None => writeln!(out, "no game running")?,
            },
            "board" => match sessions.snapshot(LOCAL_SESSION) {
                Some(snapshot) => write_snapshot(&mut out, &snapshot)?,
                None => writeln!(out, "no game running")?,
            },
            "top" => {
                let top = sessions.store().top_records(config.top_limit);
                if top.is_empty() {
                    writeln!(out, "no records yet")?;
                }
                for (i, entry) in top.iter().enumerate() {
                    writeln!(out, "{:>2}. {:<24} {:>8}", i + 1, entry.name, entry.score)?;
                }
            }
            "stats" => {
                let stats = sessions.store().get_stats(player.id);
                let rank = stats
                    .rank
                    .map(|r| format!("#{} of {}", r, stats.total_players))
                    .unwrap_or_else(|| "unranked".to_string());
                writeln!(
                    out,
                    "best {} | last {} | games {} | {}",
                    stats.record.best_score,
                    stats.record.last_score,
                    stats.record.games_played,
                    rank
                )?;
            }
            other => match GameAction::from_str(other) {
                Some(action) => match sessions.apply(LOCAL_SESSION, &player, action) {
                    Some(turn) => {
                        if !turn.applied {
                            writeln!(out, "blocked")?;
                        }
                        match turn.finish {
                            Some(finish) => write_finish(&mut out, &finish)?,
                            None => write_snapshot(&mut out, &turn.snapshot)?,
                        }
                    }
                    None => writeln!(out, "no game running, type 'play'")?,
                },
                None => writeln!(out, "unknown command '{}'; {}", other, HELP)?,
            },
        }
        out.flush()?;
    }

    Ok(())
}

fn write_snapshot(out: &mut impl Write, snapshot: &GameSnapshot) -> io::Result<()> {
    for row in snapshot.composed_board() {
        let line: String = row
            .iter()
            .map(|cell| match cell {
                Some(kind) => kind
                    .as_str()
                    .chars()
                    .next()
                    .map_or('#', |c| c.to_ascii_uppercase()),
                None => '.',
            })
            .collect();
        writeln!(out, "|{}|", line)?;
    }
    writeln!(
        out,
        "score {} | level {} | lines {}",
        snapshot.score, snapshot.level, snapshot.lines
    )
}

fn write_finish(out: &mut impl Write, finish: &Finish) -> io::Result<()> {
    write_snapshot(out, &finish.snapshot)?;
    writeln!(out, "game over, final score {}", finish.score)?;
    if finish.new_best {
        writeln!(out, "new personal best!")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall::core::{GameConfig, ScriptedSource};
    use blockfall::types::PieceKind;

    fn drive(sessions: Sessions, script: &str) -> String {
        let mut out = Vec::new();
        run(sessions, &AppConfig::default(), script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn commands_without_a_game_are_reported() {
        let sessions = Sessions::new(Arc::new(RecordsStore::in_memory()), GameConfig::default());
        let text = drive(sessions, "left\nboard\nend\nfly\n");
        assert!(text.contains("no game running, type 'play'"));
        assert!(text.contains("unknown command 'fly'"));
    }

    #[test]
    fn play_drop_and_end_records_the_score() {
        let store = Arc::new(RecordsStore::in_memory());
        let mut sessions = Sessions::new(store.clone(), GameConfig::default());
        sessions
            .start_with(LOCAL_SESSION, ScriptedSource::repeat(PieceKind::O))
            .unwrap();

        let text = drive(sessions, "drop\nend\nstats\ntop\nquit\nleft\n");
        assert!(text.contains("score 18 | level 1 | lines 0"));
        assert!(text.contains("game over, final score 18"));
        assert!(text.contains("best 18"));
        assert_eq!(store.get_record(LOCAL_PLAYER).best_score, 18);
    }
}
