//! Cooperative shutdown signal
//!
//! A clonable flag that can be waited on with a timeout. The CLI triggers it
//! from its Ctrl+C handler; [`WatchLoop`](crate::WatchLoop) sleeps on it, so
//! an interrupt ends the current sleep immediately.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::watch::{Sleeper, Wake};

#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter.
    pub fn trigger(&self) {
        let (lock, cvar) = &*self.inner;
        *guard(lock) = true;
        cvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *guard(&self.inner.0)
    }

    /// Block for up to `timeout`; returns `true` if shutdown was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut triggered = guard(lock);
        while !*triggered {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            triggered = match cvar.wait_timeout(triggered, deadline - now) {
                Ok((g, _)) => g,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        *triggered
    }
}

impl Sleeper for ShutdownSignal {
    fn sleep(&mut self, interval: Duration) -> Wake {
        if self.wait_timeout(interval) {
            Wake::Interrupted
        } else {
            Wake::Elapsed
        }
    }
}

fn guard(lock: &Mutex<bool>) -> MutexGuard<'_, bool> {
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
