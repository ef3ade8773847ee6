//! Core game logic module for Snake
//!
//! This module contains all the game rules without any I/O or rendering
//! dependencies: fixed-tick movement, consumption, collision detection,
//! the speed-up curve and the tick source itself.

pub mod clock;
pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use clock::GameClock;
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, StepOutcome};
pub use state::{GameSnapshot, GameState, Position, RunState, Snake};
