//! Mock timer for testing without real time passing.
//!
//! [`MockTimer`] is a virtual clock: every delay advances virtual time by
//! the requested amount and resolves immediately. A full dispatch run
//! therefore finishes in a single poll while still accounting for every
//! modeled second, which makes door and travel timings easy to assert.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lift_sim::{ElevatorController, ElevatorConfig, StartOutcome};
//! use lift_sim::hal::MockTimer;
//! use lift_sim::traits::Timer;
//!
//! # tokio_test_block_on(async {
//! let timer = MockTimer::new();
//! let controller = ElevatorController::new(ElevatorConfig::default(), timer.clone());
//!
//! controller.call(2).unwrap();
//! assert_eq!(controller.start().await, StartOutcome::Completed);
//!
//! // One floor of travel, door dwell, door close
//! assert_eq!(timer.now_ms(), 1000 + 2000 + 1000);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use core::future::Future;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::traits::Timer;

/// Virtual clock that records every requested delay.
///
/// Clones share the same clock and delay log, so a test can keep one handle
/// while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTimer {
    now: Arc<AtomicU64>,
    delays: Arc<Mutex<Vec<u64>>>,
}

impl MockTimer {
    /// Creates a new mock timer starting at 0ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    /// Advances the clock by the given duration without recording a delay.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Every delay requested so far, in order.
    pub fn delays(&self) -> Vec<u64> {
        self.delays
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Sum of all recorded delays.
    pub fn total_delay_ms(&self) -> u64 {
        self.delays().iter().sum()
    }

    /// Forget recorded delays (the clock keeps its value).
    pub fn clear_delays(&self) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.clear();
        }
    }
}

impl Timer for MockTimer {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn delay_ms(&self, ms: u64) -> impl Future<Output = ()> + Send {
        self.now.fetch_add(ms, Ordering::SeqCst);
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(ms);
        }
        core::future::ready(())
    }
}
