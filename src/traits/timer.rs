//! Time source and suspension trait for the dispatch loop.
//!
//! The dispatch loop never sleeps directly. Every modeled duration (door
//! closing before departure, travel between floors, door dwell, door closing
//! after a stop) goes through a [`Timer`], which lets the same loop run
//! against real time on a server and against virtual time in tests.
//!
//! # Implementations
//!
//! | Type | Time source |
//! |------|-------------|
//! | [`MockTimer`](crate::hal::MockTimer) | Virtual clock, delays resolve instantly |
//! | `TokioTimer` | `tokio::time` (feature `rt`) |
//!
//! # Example
//!
//! ```rust
//! use lift_sim::traits::Timer;
//! use lift_sim::hal::MockTimer;
//!
//! let timer = MockTimer::new();
//! assert_eq!(timer.now_ms(), 0);
//!
//! timer.advance(250);
//! assert_eq!(timer.now_ms(), 250);
//! ```

use core::future::Future;

/// Monotonic clock plus an async delay.
///
/// Implementors must be shareable across tasks: the controller holds one
/// timer and awaits its delays from whichever task runs the dispatch loop.
pub trait Timer: Send + Sync {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;

    /// Suspend for the specified number of milliseconds.
    fn delay_ms(&self, ms: u64) -> impl Future<Output = ()> + Send;
}
