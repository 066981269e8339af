//! Real-time timer backed by `tokio::time`.
//!
//! Under `#[tokio::test(start_paused = true)]` tokio's clock is virtual and
//! auto-advances whenever every task is idle, so the same timer also gives
//! deterministic interleaving tests.

use core::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::traits::Timer;

/// Timer that sleeps on the tokio runtime.
#[derive(Debug, Clone, Copy)]
pub struct TokioTimer {
    start: Instant,
}

impl TokioTimer {
    /// Create a timer whose epoch is now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for TokioTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for TokioTimer {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn delay_ms(&self, ms: u64) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(Duration::from_millis(ms))
    }
}
