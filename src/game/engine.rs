use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    config::GameConfig,
    direction::Direction,
    state::{GameState, Position, RunState, Snake},
};

/// What a single tick did. The caller mirrors this onto the clock: a new
/// interval when food was eaten, a stop when the game terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Tick interval in effect after this tick
    pub tick_ms: u64,
    /// Whether the game is over
    pub terminated: bool,
}

/// The game engine: movement, consumption, collision and speed-up
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with a deterministic food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fresh game: two zeroed segments heading right, food on a random
    /// cell, base tick interval
    pub fn reset(&mut self) -> GameState {
        GameState {
            snake: Snake::new(self.config.capacity()),
            food: self.spawn_food(),
            score: 0,
            run_state: RunState::Running,
            tick_ms: self.config.base_tick_ms,
        }
    }

    /// Execute one tick. No-op once the game is over.
    pub fn step(&mut self, state: &mut GameState, input: Direction) -> StepOutcome {
        if !state.is_running() {
            return StepOutcome {
                ate_food: false,
                tick_ms: state.tick_ms,
                terminated: true,
            };
        }

        state.snake.advance(input, self.config.block_size);

        let ate_food = state.snake.head() == state.food;
        if ate_food {
            state.snake.grow();
            state.score += 1;
            state.tick_ms = self.config.tick_interval_after(state.score);
            state.food = self.spawn_food();
        }

        if state.snake.hits_self() {
            state.run_state = RunState::Over;
        }

        // The head may sit exactly on the boundary line; only crossing it
        // ends the game.
        let head = state.snake.head();
        if head.x < 0 || head.x > self.config.screen_width {
            state.run_state = RunState::Over;
        }
        if head.y < 0 || head.y > self.config.screen_height {
            state.run_state = RunState::Over;
        }

        StepOutcome {
            ate_food,
            tick_ms: state.tick_ms,
            terminated: !state.is_running(),
        }
    }

    /// Food lands on any grid-aligned cell; snake occupancy is not
    /// consulted.
    fn spawn_food(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.config.cells_x()) * self.config.block_size;
        let y = self.rng.gen_range(0..self.config.cells_y()) * self.config.block_size;
        Position::new(x, y)
    }
}
