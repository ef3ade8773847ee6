use serde::{Deserialize, Serialize};

/// Fixed parameters of a game.
///
/// The playing field is a pixel space discretized into square cells of
/// `block_size`; every position the engine produces is a multiple of
/// `block_size` on both axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the playing field in pixels
    pub screen_width: i32,
    /// Height of the playing field in pixels
    pub screen_height: i32,
    /// Side of one grid cell in pixels
    pub block_size: i32,
    /// Tick interval at the start of a game, in milliseconds
    pub base_tick_ms: u64,
    /// How much the tick interval shrinks per food eaten
    pub speedup_step_ms: u64,
    /// Lower bound on the tick interval
    pub min_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 1300,
            screen_height: 750,
            block_size: 20,
            base_tick_ms: 200,
            speedup_step_ms: 10,
            min_tick_ms: 50,
        }
    }
}

impl GameConfig {
    /// Create a small field for testing
    pub fn small() -> Self {
        Self {
            screen_width: 100,
            screen_height: 100,
            ..Default::default()
        }
    }

    /// Maximum number of segments that fit on the field
    pub fn capacity(&self) -> usize {
        (self.screen_width * self.screen_height / (self.block_size * self.block_size)) as usize
    }

    /// Number of food cells along the x axis
    pub fn cells_x(&self) -> i32 {
        self.screen_width / self.block_size
    }

    /// Number of food cells along the y axis
    pub fn cells_y(&self) -> i32 {
        self.screen_height / self.block_size
    }

    /// Tick interval after `eaten` foods, clamped at the floor
    pub fn tick_interval_after(&self, eaten: u32) -> u64 {
        self.base_tick_ms
            .saturating_sub(self.speedup_step_ms * u64::from(eaten))
            .max(self.min_tick_ms)
    }
}
