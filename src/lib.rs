//! Classic Snake - a wraparound Snake game for the terminal
//!
//! This library provides:
//! - Core game logic (game module), free of I/O and timing
//! - A session layer wiring the engine to high score persistence,
//!   feedback cues and the leaderboard
//! - Terminal front end (render, input and modes modules)

pub mod config;
pub mod feedback;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
pub mod storage;
