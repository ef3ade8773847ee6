//! Terminal snake with a fixed-tick engine
//!
//! This library provides:
//! - Core game logic: movement, consumption, collision, speed-up (game module)
//! - Keyboard mapping and the reversal filter (input module)
//! - TUI rendering from state snapshots (render module)
//! - Session wall-clock metrics (metrics module)
//! - Shared-state orchestration of the tick task and the repaint loop
//!   (session module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod render;
pub mod session;
