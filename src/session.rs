use std::io::{Stderr, stderr};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::time::interval;

use crate::game::{Direction, GameClock, GameConfig, GameEngine, GameSnapshot, GameState, RunState};
use crate::input::{InputHandler, KeyAction, filter_direction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Everything the tick task and the render loop share. Guarded by a
/// single mutex; each side holds it for one full update or one snapshot.
struct Shared {
    engine: GameEngine,
    state: GameState,
    /// Filtered direction waiting for the next tick
    pending: Option<Direction>,
}

/// One interactive game from launch to quit.
///
/// Three paths touch the shared state: the clock task mutates it once per
/// tick, the render poll copies a snapshot once per frame, and key events
/// write the pending direction. All three serialize on the one lock.
pub struct GameSession {
    shared: Arc<Mutex<Shared>>,
    clock: GameClock,
    renderer: Renderer,
    input_handler: InputHandler,
    metrics: GameMetrics,
    should_quit: bool,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config.clone());
        let state = engine.reset();
        let clock = GameClock::new(state.tick_ms);

        Self {
            shared: Arc::new(Mutex::new(Shared {
                engine,
                state,
                pending: None,
            })),
            clock,
            renderer: Renderer::new(config),
            input_handler: InputHandler::new(),
            metrics: GameMetrics::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut out = stderr();
        execute!(out, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(out);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        self.start_clock();
        let result = self.run_loop(&mut terminal).await;
        self.clock.stop();

        self.cleanup_terminal(&mut terminal)?;
        result
    }

    /// Spawn the tick task: consume the pending direction (falling back to
    /// the committed one), run one engine step, mirror the outcome onto
    /// the clock.
    fn start_clock(&self) {
        let shared = Arc::clone(&self.shared);
        let clock = self.clock.clone();

        let _handle = self.clock.start(move || {
            let Ok(mut guard) = shared.lock() else {
                // a panicked lock holder took the session down with it
                clock.stop();
                return;
            };
            let Shared {
                engine,
                state,
                pending,
            } = &mut *guard;

            let input = pending.take().unwrap_or(state.snake.direction);
            let outcome = engine.step(state, input);

            if outcome.ate_food {
                clock.set_interval(outcome.tick_ms);
            }
            if outcome.terminated {
                clock.stop();
            }
        });
    }

    async fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Free-running repaint poll, independent of the game tick cadence
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    let snapshot = self.snapshot()?;
                    if snapshot.run_state == RunState::Running {
                        self.metrics.update();
                    }
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => self.steer(direction)?,
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    /// Run the reversal filter against the committed direction and park
    /// the result for the next tick
    fn steer(&self, requested: Direction) -> Result<()> {
        let mut guard = self.lock()?;
        if let Some(direction) = filter_direction(guard.state.snake.direction, requested) {
            guard.pending = Some(direction);
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<GameSnapshot> {
        Ok(self.lock()?.state.snapshot())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Shared>> {
        self.shared
            .lock()
            .map_err(|_| anyhow!("game state lock poisoned"))
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn fast_config() -> GameConfig {
        GameConfig {
            base_tick_ms: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::new(GameConfig::default());
        let snapshot = session.snapshot().unwrap();

        assert_eq!(snapshot.run_state, RunState::Running);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.segments.len(), 2);
        assert_eq!(session.clock.interval(), 200);
    }

    #[test]
    fn test_steer_parks_filtered_direction() {
        let session = GameSession::new(GameConfig::default());

        session.steer(Direction::Up).unwrap();
        assert_eq!(session.lock().unwrap().pending, Some(Direction::Up));
    }

    #[test]
    fn test_steer_rejects_reversal() {
        let session = GameSession::new(GameConfig::default());

        // committed direction starts as Right
        session.steer(Direction::Left).unwrap();
        assert_eq!(session.lock().unwrap().pending, None);
    }

    #[tokio::test]
    async fn test_clock_task_advances_the_game() {
        let session = GameSession::new(fast_config());
        session.start_clock();

        tokio::time::sleep(Duration::from_millis(100)).await;
        session.clock.stop();

        let snapshot = session.snapshot().unwrap();
        let head = snapshot.head().unwrap();
        assert!(head.x > 0);
    }

    #[tokio::test]
    async fn test_termination_stops_the_clock() {
        let session = GameSession::new(fast_config());
        {
            let mut guard = session.lock().unwrap();
            guard.state.snake.body[0] = Position::new(1300, 100);
            guard.state.snake.body[1] = Position::new(1280, 100);
            guard.state.food = Position::new(500, 500);
        }

        session.start_clock();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!session.clock.is_running());
        let frozen = session.snapshot().unwrap();
        assert_eq!(frozen.run_state, RunState::Over);

        // no further ticks fire once the clock is stopped
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.snapshot().unwrap(), frozen);
    }

    #[test]
    fn test_snapshots_are_consistent_under_contention() {
        let config = GameConfig::default();
        let block = config.block_size;
        let mut engine = GameEngine::with_seed(config, 42);
        let state = engine.reset();
        let shared = Arc::new(Mutex::new(Shared {
            engine,
            state,
            pending: None,
        }));
        let done = Arc::new(AtomicBool::new(false));

        let updater = {
            let shared = Arc::clone(&shared);
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let mut guard = shared.lock().unwrap();
                    let Shared { engine, state, .. } = &mut *guard;
                    // force a consumption every tick to exercise growth
                    state.food = state.snake.head().stepped(Direction::Right, block);
                    engine.step(state, Direction::Right);
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        let readers: Vec<_> = (0..2)
            .map(|_| {
                let shared = Arc::clone(&shared);
                let done = Arc::clone(&done);
                std::thread::spawn(move || {
                    while !done.load(Ordering::SeqCst) {
                        let snapshot = shared.lock().unwrap().state.snapshot();
                        // a torn read would break length == 2 + score
                        assert_eq!(snapshot.segments.len(), 2 + snapshot.score as usize);
                    }
                })
            })
            .collect();

        updater.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        let guard = shared.lock().unwrap();
        assert_eq!(guard.state.score, 50);
        assert_eq!(guard.state.snake.len, 52);
        assert!(guard.state.is_running());
    }
}
