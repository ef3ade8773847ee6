use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Periodic tick source with a mutable interval.
///
/// The interval is re-read before every sleep, so `set_interval` takes
/// effect on the next scheduled fire, never retroactively. `stop` is
/// idempotent and safe to call from inside the tick callback; at most the
/// in-flight callback finishes after it.
#[derive(Clone)]
pub struct GameClock {
    interval_ms: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
}

impl GameClock {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: Arc::new(AtomicU64::new(interval_ms)),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawn the tick task. The first fire happens one full interval after
    /// the call; `tick` then runs once per interval until `stop`.
    pub fn start<F>(&self, mut tick: F) -> JoinHandle<()>
    where
        F: FnMut() + Send + 'static,
    {
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let interval_ms = Arc::clone(&self.interval_ms);

        tokio::spawn(async move {
            while running.load(Ordering::SeqCst) {
                let ms = interval_ms.load(Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(ms)).await;
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                tick();
            }
        })
    }

    /// Takes effect on the next scheduled fire
    pub fn set_interval(&self, ms: u64) {
        self.interval_ms.store(ms, Ordering::SeqCst);
    }

    pub fn interval(&self) -> u64 {
        self.interval_ms.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_clock_fires_repeatedly() {
        let clock = GameClock::new(10);
        let count = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&count);
        let _handle = clock.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        clock.stop();

        assert!(count.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_stop_halts_ticking() {
        let clock = GameClock::new(10);
        let count = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&count);
        let handle = clock.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        clock.stop();
        handle.await.unwrap();

        let after_stop = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
        assert!(!clock.is_running());
    }

    #[tokio::test]
    async fn test_stop_from_within_tick_callback() {
        let clock = GameClock::new(10);
        let count = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&count);
        let stopper = clock.clone();
        let handle = clock.start(move || {
            if counter.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
                stopper.stop();
            }
        });

        handle.await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let clock = GameClock::new(200);
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());
    }

    #[test]
    fn test_interval_change_is_visible() {
        let clock = GameClock::new(200);
        assert_eq!(clock.interval(), 200);
        clock.set_interval(50);
        assert_eq!(clock.interval(), 50);
    }
}
