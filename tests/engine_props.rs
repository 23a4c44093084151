//! Property tests for engine invariants under arbitrary command streams

use proptest::prelude::*;

use blockfall::core::{
    calculate_level, line_clear_score, GameConfig, GameState, RandSource, ScriptedSource,
};
use blockfall::types::{GameAction, PieceKind, LINE_SCORES};

fn action() -> impl Strategy<Value = GameAction> {
    prop_oneof![
        Just(GameAction::MoveLeft),
        Just(GameAction::MoveRight),
        Just(GameAction::SoftDrop),
        Just(GameAction::Rotate),
        Just(GameAction::HardDrop),
    ]
}

fn kind() -> impl Strategy<Value = PieceKind> {
    (0usize..7).prop_map(|i| PieceKind::ALL[i])
}

proptest! {
    #[test]
    fn spawn_never_collides_on_fresh_board(kind in kind(), width in 4u8..=64, height in 4u8..=64) {
        let config = GameConfig::new(width, height).unwrap();
        let state = GameState::new(config, ScriptedSource::repeat(kind)).unwrap();
        prop_assert!(!state.game_over());
        let active = state.active().unwrap();
        prop_assert_eq!(active.y, 0);
        prop_assert!(!state.collision(active.x, active.y, &active.shape));
    }

    #[test]
    fn command_streams_keep_invariants(
        seed in any::<u64>(),
        width in 4u8..=12,
        height in 4u8..=22,
        actions in prop::collection::vec(action(), 0..300),
    ) {
        let config = GameConfig::new(width, height).unwrap();
        let mut state = GameState::new(config, RandSource::seeded(seed)).unwrap();
        let mut last_score = 0;

        for action in actions {
            let before_active = state.active();
            let before_board = state.board().clone();
            let applied = state.apply_action(action);

            if !applied {
                prop_assert_eq!(state.active(), before_active);
                prop_assert_eq!(state.board(), &before_board);
            }

            prop_assert_eq!(state.board().rows().count(), height as usize);
            prop_assert!(state.board().rows().all(|row| row.len() == width as usize));
            prop_assert!(state.score() >= last_score);
            prop_assert_eq!(state.level(), state.lines() / 10 + 1);
            prop_assert_eq!(state.game_over(), state.active().is_none());
            for y in 0..height as usize {
                prop_assert!(!state.board().is_row_full(y));
            }
            if let Some(active) = state.active() {
                prop_assert!(!state.collision(active.x, active.y, &active.shape));
            }
            last_score = state.score();
        }
    }

    #[test]
    fn clearing_k_rows_adds_k_empty_rows_on_top(
        full in prop::collection::btree_set(0usize..20, 0..6),
    ) {
        let mut board = blockfall::core::Board::default();
        for y in 0..20 {
            for x in 0..10 {
                // Full rows, others with a hole in column 0
                if full.contains(&y) || x != 0 {
                    board.set(x, y as i32, Some(PieceKind::T));
                }
            }
        }

        let cleared = board.clear_full_rows();
        prop_assert_eq!(cleared, full.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(board.rows().count(), 20);
        for (y, row) in board.rows().enumerate() {
            let empty = row.iter().all(Option::is_none);
            prop_assert_eq!(empty, y < full.len());
        }
    }

    #[test]
    fn level_formula_holds(lines in 0u32..100_000) {
        prop_assert_eq!(calculate_level(lines), lines / 10 + 1);
    }

    #[test]
    fn line_scores_cap_at_four(lines in 0usize..50) {
        let expected = LINE_SCORES[lines.min(4)];
        prop_assert_eq!(line_clear_score(lines), expected);
    }
}
