//! Trait definitions for the seams between the elevator core and its
//! environment.
//!
//! The core has exactly one external dependency it cannot model itself:
//! the passage of time. [`Timer`] abstracts it so the dispatch loop can be
//! driven by a real clock or by a virtual one.

pub mod timer;

pub use timer::*;
