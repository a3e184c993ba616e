//! Idle-phase pacing: sleep until a deadline or a stop request.

use std::time::Duration;

use crate::signal::ShutdownFlag;

/// Suspends the loop thread between cycles.
///
/// Implementations may return early for any reason; the scheduler re-checks
/// its deadlines after every pause, so a short or interrupted pause only
/// costs another iteration.
pub trait Pacer: Send + Sync {
    /// Pause for at most `budget`, returning promptly once `shutdown` is set.
    fn pause(&self, budget: Duration, shutdown: &ShutdownFlag);
}

/// Yield, then sleep in slices of at most `granularity`.
///
/// Stop latency is bounded by the granularity.
#[derive(Debug, Clone, Copy)]
pub struct SleepPacer {
    granularity: Duration,
}

impl SleepPacer {
    pub fn new(granularity: Duration) -> Self {
        Self { granularity }
    }

    pub fn granularity(&self) -> Duration {
        self.granularity
    }
}

impl Default for SleepPacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(1))
    }
}

impl Pacer for SleepPacer {
    fn pause(&self, budget: Duration, shutdown: &ShutdownFlag) {
        std::thread::yield_now();
        if shutdown.is_set() {
            return;
        }
        std::thread::sleep(budget.min(self.granularity));
    }
}

/// Block on the shutdown flag's condition variable for the whole budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalPacer;

impl Pacer for SignalPacer {
    fn pause(&self, budget: Duration, shutdown: &ShutdownFlag) {
        shutdown.wait_timeout(budget);
    }
}
