//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine is driven by an external clock: callers buffer direction changes and
//! call `tick` at a fixed interval.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{SnakeEngine, TickEvent};
pub use state::{CellKind, GameStatus, Grid, Position, Snake, Snapshot};
