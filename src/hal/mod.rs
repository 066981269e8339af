//! Timer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Virtual clock for tests and offline simulation
//! - `realtime`: Real time on the tokio runtime (requires `rt` feature)

pub mod mock;

#[cfg(feature = "rt")]
pub mod realtime;

pub use mock::*;

#[cfg(feature = "rt")]
pub use realtime::*;
