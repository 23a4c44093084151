//! Session-keyed registry of running matches
//!
//! A chat or network front end hosts one match per conversation. [`Sessions`]
//! owns those matches and reports each finished game to the shared
//! [`RecordsStore`] exactly once, whether it ended by topping out or because
//! the player gave up.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};

use crate::core::{
    ConfigError, GameConfig, GameSnapshot, GameState, LockEvent, RandSource, ShapeSource,
};
use crate::records::{PlayerId, PlayerMeta, RecordsStore};
use crate::types::GameAction;

/// Conversation or connection hosting a match
pub type SessionId = i64;

/// Who is playing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub meta: PlayerMeta,
}

impl Player {
    pub fn new(id: PlayerId, meta: PlayerMeta) -> Self {
        Self { id, meta }
    }
}

/// A game reported to the leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finish {
    pub score: u64,
    pub new_best: bool,
    pub snapshot: GameSnapshot,
}

/// Result of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Whether the command changed the match
    pub applied: bool,
    pub snapshot: GameSnapshot,
    /// Lock caused by this command, if any
    pub lock: Option<LockEvent>,
    /// Set when this command ended the game
    pub finish: Option<Finish>,
}

/// Running matches keyed by session
pub struct Sessions {
    store: Arc<RecordsStore>,
    config: GameConfig,
    seed: Option<u64>,
    started: u64,
    games: HashMap<SessionId, GameState>,
}

impl std::fmt::Debug for Sessions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sessions")
            .field("config", &self.config)
            .field("seed", &self.seed)
            .field("active", &self.games.len())
            .finish()
    }
}

impl Sessions {
    /// Registry whose matches draw pieces from OS entropy
    pub fn new(store: Arc<RecordsStore>, config: GameConfig) -> Self {
        Self {
            store,
            config,
            seed: None,
            started: 0,
            games: HashMap::new(),
        }
    }

    /// Registry whose matches are reproducible from `seed`
    ///
    /// Each started match gets its own stream derived from the seed and the
    /// number of matches started before it.
    pub fn with_seed(store: Arc<RecordsStore>, config: GameConfig, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(store, config)
        }
    }

    pub fn store(&self) -> &Arc<RecordsStore> {
        &self.store
    }

    /// Start (or restart) the match for `session_id`
    ///
    /// A match already running there is discarded without being recorded.
    pub fn start(&mut self, session_id: SessionId) -> Result<GameSnapshot, ConfigError> {
        let source = match self.seed {
            Some(seed) => RandSource::seeded(seed.wrapping_add(self.started)),
            None => RandSource::from_entropy(),
        };
        self.start_with(session_id, source)
    }

    /// Start a match fed by an explicit shape source
    pub fn start_with(
        &mut self,
        session_id: SessionId,
        source: impl ShapeSource + 'static,
    ) -> Result<GameSnapshot, ConfigError> {
        let game = GameState::new(self.config, source)?;
        self.started = self.started.wrapping_add(1);

        let snapshot = game.snapshot();
        if self.games.insert(session_id, game).is_some() {
            debug!("session {} restarted its match", session_id);
        } else {
            debug!("session {} started a match", session_id);
        }
        Ok(snapshot)
    }

    /// Run one command against the session's match
    ///
    /// `None` when the session has no running match. When the command ends the
    /// game the score is recorded for `player` and the session is closed.
    pub fn apply(
        &mut self,
        session_id: SessionId,
        player: &Player,
        action: GameAction,
    ) -> Option<Turn> {
        let game = self.games.get_mut(&session_id)?;
        game.take_last_event();

        let applied = game.apply_action(action);
        let lock = game.take_last_event();
        let snapshot = game.snapshot();

        let finish = if game.game_over() {
            self.close(session_id, player)
        } else {
            None
        };

        Some(Turn {
            applied,
            snapshot,
            lock,
            finish,
        })
    }

    /// End the session's match voluntarily, recording its current score
    pub fn end(&mut self, session_id: SessionId, player: &Player) -> Option<Finish> {
        self.close(session_id, player)
    }

    fn close(&mut self, session_id: SessionId, player: &Player) -> Option<Finish> {
        let game = self.games.remove(&session_id)?;
        let score = u64::from(game.score());
        let new_best = self.store.record_score(player.id, &player.meta, score);
        info!(
            "session {} finished: player {} scored {}{}",
            session_id,
            player.id,
            score,
            if new_best { " (new best)" } else { "" }
        );

        Some(Finish {
            score,
            new_best,
            snapshot: game.snapshot(),
        })
    }

    pub fn snapshot(&self, session_id: SessionId) -> Option<GameSnapshot> {
        self.games.get(&session_id).map(GameState::snapshot)
    }

    pub fn contains(&self, session_id: SessionId) -> bool {
        self.games.contains_key(&session_id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
