use std::sync::{
    Arc, Condvar, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

/// Cooperative stop request shared between a controller and the loop thread.
///
/// Besides the flag itself it carries a condition variable so waiters can
/// sleep until either a timeout or the flag is raised.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    flag: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.inner.flag.load(Ordering::Acquire)
    }

    /// Raise the flag and wake every waiter.
    pub fn set(&self) {
        self.inner.flag.store(true, Ordering::Release);
        let _guard = self
            .inner
            .lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.inner.wake.notify_all();
    }

    /// Block for up to `timeout` or until the flag is raised.
    ///
    /// Returns whether the flag is set on return. Spurious wakeups are absorbed
    /// here; the caller simply re-checks its own deadline.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self
            .inner
            .lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _guard = self
            .inner
            .wake
            .wait_timeout_while(guard, timeout, |_| !self.is_set())
            .map(|(g, _)| g)
            .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        self.is_set()
    }
}
