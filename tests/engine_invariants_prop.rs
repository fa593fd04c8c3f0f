//! Property tests for the tick kernel.
//!
//! Random direction sequences are fed to seeded engines; after every tick
//! the board must stay consistent no matter what the input was.

use std::collections::HashSet;

use classic_snake::game::{Direction, GameConfig, SnakeEngine, TickEvent};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn inputs() -> impl Strategy<Value = Vec<Option<Direction>>> {
    prop::collection::vec(prop::option::of(direction()), 1..300)
}

proptest! {
    #[test]
    fn length_never_shrinks_and_score_tracks_growth(
        seed in any::<u64>(),
        width in 3usize..12,
        height in 3usize..12,
        inputs in inputs(),
    ) {
        let mut engine = SnakeEngine::with_seed(&GameConfig::new(width, height), seed);
        let mut len = engine.snake().len();
        let mut score = engine.score();

        for input in inputs {
            if let Some(direction) = input {
                engine.set_direction(direction);
            }
            let event = engine.tick();

            let new_len = engine.snake().len();
            prop_assert!(new_len >= len);
            match event {
                TickEvent::AteFood => {
                    prop_assert_eq!(new_len, len + 1);
                    prop_assert_eq!(engine.score(), score + 1);
                }
                TickEvent::Moved | TickEvent::GameOver => {
                    prop_assert_eq!(new_len, len);
                    prop_assert_eq!(engine.score(), score);
                }
            }
            len = new_len;
            score = engine.score();

            if event.is_game_over() {
                break;
            }
        }
    }

    #[test]
    fn board_stays_consistent(
        seed in any::<u64>(),
        inputs in inputs(),
    ) {
        let mut engine = SnakeEngine::with_seed(&GameConfig::new(8, 6), seed);

        for input in inputs {
            if let Some(direction) = input {
                engine.set_direction(direction);
            }
            if engine.tick().is_game_over() {
                break;
            }

            let grid = engine.grid();
            let cells: HashSet<_> = engine.snake().body.iter().copied().collect();
            prop_assert_eq!(cells.len(), engine.snake().len());
            prop_assert!(cells.iter().all(|&c| grid.contains(c)));
            if engine.snake().len() < grid.cell_count() {
                prop_assert!(!cells.contains(&engine.food()));
                prop_assert!(grid.contains(engine.food()));
            }
        }
    }

    #[test]
    fn reverse_requests_always_rejected(
        seed in any::<u64>(),
        inputs in inputs(),
    ) {
        let mut engine = SnakeEngine::with_seed(&GameConfig::default(), seed);

        for input in inputs {
            if let Some(direction) = input {
                engine.set_direction(direction);
            }
            let current = engine.direction();
            prop_assert!(!engine.set_direction(current.opposite()));
            prop_assert_ne!(engine.pending_direction(), current.opposite());

            let head = engine.snake().head();
            if engine.tick().is_game_over() {
                break;
            }
            // One step, possibly across an edge, never straight back
            let grid = engine.grid();
            let back = grid.wrap(head.moved_in_direction(current.opposite()));
            prop_assert_ne!(engine.snake().head(), back);
        }
    }
}
