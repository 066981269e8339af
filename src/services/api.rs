//! API response types for the HTTP gateway.

use serde::{Deserialize, Serialize};

use crate::{CallOutcome, ElevatorStatus, StartOutcome};

// Re-export shared request types from messages module
pub use crate::messages::{CallRequest, RequestError};

// ============================================================================
// Response Types
// ============================================================================

/// API response wrapper for consistent JSON structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (present when success=true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present when success=false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Current car state response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Floor the car occupies (or is entering)
    pub current_floor: i32,
    /// Whether the door is open
    pub door_open: bool,
    /// Whether the dispatch loop is active
    pub running: bool,
    /// Unserved floors, ascending
    pub pending_requests: Vec<i32>,
}

impl From<ElevatorStatus> for StatusResponse {
    fn from(status: ElevatorStatus) -> Self {
        Self {
            current_floor: status.current_floor,
            door_open: status.door_open,
            running: status.running,
            pending_requests: status.pending_requests,
        }
    }
}

/// Command result response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Whether the command changed or will change anything
    pub accepted: bool,
    /// Result details
    pub result: String,
}

impl CommandResponse {
    /// Command took effect.
    pub fn accepted(result: impl Into<String>) -> Self {
        Self {
            accepted: true,
            result: result.into(),
        }
    }

    /// Command was a defined no-op.
    pub fn ignored(result: impl Into<String>) -> Self {
        Self {
            accepted: false,
            result: result.into(),
        }
    }
}

impl From<CallOutcome> for CommandResponse {
    fn from(outcome: CallOutcome) -> Self {
        match outcome {
            CallOutcome::Queued => Self::accepted("queued"),
            CallOutcome::AlreadyPending => Self::ignored("already_pending"),
        }
    }
}

impl From<StartOutcome> for CommandResponse {
    fn from(outcome: StartOutcome) -> Self {
        match outcome {
            StartOutcome::Completed => Self::accepted("completed"),
            StartOutcome::Stopped => Self::accepted("stopped"),
            StartOutcome::AlreadyRunning => Self::ignored("already_running"),
            StartOutcome::NoPendingRequests => Self::ignored("no_pending_requests"),
        }
    }
}
