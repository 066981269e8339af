//! Network services for the HTTP gateway.
//!
//! The gateway is a thin translation layer: it validates request bodies,
//! calls the matching [`ElevatorController`](crate::ElevatorController)
//! operation, and wraps the outcome in an [`ApiResponse`]. All routes share
//! one controller through an `Arc`:
//!
//! ```ignore
//! use std::sync::Arc;
//! use lift_sim::services::{build_router, WebServerConfig};
//!
//! let controller = Arc::new(ElevatorController::new(config.elevator, TokioTimer::new()));
//! let router = build_router(Arc::clone(&controller), &WebServerConfig::default());
//! ```

pub mod api;
pub mod web;

pub use api::*;
pub use web::*;
