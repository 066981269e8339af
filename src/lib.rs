//! # lift-sim
//!
//! A single-car elevator simulator: floor calls are queued, a dispatch loop
//! moves the car one floor at a time toward the nearest request, and the
//! door cycles at every served stop. The current state is always available
//! for observation.
//!
//! ## Features
//!
//! - **Nearest-first dispatch**: the nearest request is held as the target until a stop is served
//! - **Idempotent calls**: a floor is queued at most once until served
//! - **Single dispatch loop**: a second `start` while running is a no-op
//! - **Prompt stop**: `stop` takes effect at the next step boundary
//! - **Injectable time**: the loop waits through a [`Timer`], real or virtual
//!
//! ## Architecture
//!
//! - `elevator` - Car state and single-step dispatch primitives
//! - `controller` - Shared controller that runs the timed dispatch loop
//! - `traits` - Timer abstraction
//! - `hal` - Timer implementations (mock for testing, tokio for real time)
//! - `config` - Configuration with defaults and TOML loading
//! - `services` - HTTP gateway (feature `web`)
//!
//! ## Example
//!
//! ```rust
//! use lift_sim::{ElevatorController, ElevatorConfig, StartOutcome};
//! use lift_sim::hal::MockTimer;
//!
//! # tokio_test_block_on(async {
//! let controller = ElevatorController::new(ElevatorConfig::default(), MockTimer::new());
//!
//! controller.call(5).unwrap();
//! controller.call(2).unwrap();
//! controller.call(2).unwrap(); // no-op
//!
//! assert_eq!(controller.start().await, StartOutcome::Completed);
//! assert_eq!(controller.status().current_floor, 5);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

/// Shared configuration for the car, its timings, and the web server.
pub mod config;
/// Shared controller owning the car and running the dispatch loop.
pub mod controller;
/// Car state machine with single-step dispatch primitives.
pub mod elevator;
/// Timer implementations (virtual and tokio-backed).
pub mod hal;
/// Core traits for the time abstraction.
pub mod traits;

/// Request types for the HTTP gateway.
#[cfg(feature = "web")]
pub mod messages;

/// HTTP gateway (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use config::{Config, ConfigError, ElevatorConfig, TimingConfig, WebConfig};
pub use controller::ElevatorController;
pub use elevator::{
    CallOutcome, DispatchTicket, Elevator, ElevatorError, ElevatorStatus, FloorBounds,
    StartOutcome, Step,
};
pub use traits::Timer;

#[cfg(feature = "web")]
pub use messages::{parse_call_request, CallRequest, RequestError};
