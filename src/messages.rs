//! Request types for the HTTP gateway.
//!
//! Validation of the raw request happens here, before anything reaches the
//! car: a call whose `floor` is missing or not an integer is rejected with
//! [`RequestError::InvalidArgument`].
//!
//! # Example
//!
//! ```
//! use lift_sim::messages::{parse_call_request, CallRequest, RequestError};
//!
//! let req = parse_call_request(br#"{"floor": 4}"#).unwrap();
//! assert_eq!(req, CallRequest::new(4));
//!
//! let err = parse_call_request(br#"{"floor": "4"}"#).unwrap_err();
//! assert!(matches!(err, RequestError::InvalidArgument(_)));
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// Request to call the car to a floor.
///
/// # JSON Example
///
/// ```json
/// {"floor": 3}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    /// Requested floor
    pub floor: i32,
}

impl CallRequest {
    /// Create a new call request.
    pub fn new(floor: i32) -> Self {
        Self { floor }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// A request that must not reach the car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Malformed body, or an argument of the wrong type.
    InvalidArgument(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for RequestError {}

// ============================================================================
// Parsing Functions
// ============================================================================

/// Parse a call request from JSON bytes.
///
/// Only an integer `floor` is accepted: strings, fractions, `null` and
/// out-of-`i32` values are all `InvalidArgument`.
pub fn parse_call_request(body: &[u8]) -> Result<CallRequest, RequestError> {
    serde_json::from_slice(body).map_err(|e| {
        RequestError::InvalidArgument(format!("floor must be an integer ({})", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_integer_floor() {
        assert_eq!(
            parse_call_request(br#"{"floor": 7}"#),
            Ok(CallRequest::new(7))
        );
        assert_eq!(
            parse_call_request(br#"{"floor": -2}"#),
            Ok(CallRequest::new(-2))
        );
    }

    #[test]
    fn parse_ignores_extra_fields() {
        let req = parse_call_request(br#"{"floor": 3, "note": "lobby"}"#).unwrap();
        assert_eq!(req.floor, 3);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        for body in [
            &br#"{"floor": "3"}"#[..],
            br#"{"floor": null}"#,
            br#"{"floor": true}"#,
            br#"{"floor": [3]}"#,
        ] {
            let err = parse_call_request(body).unwrap_err();
            assert!(matches!(err, RequestError::InvalidArgument(_)), "{:?}", body);
        }
    }

    #[test]
    fn parse_rejects_fractional_and_overflow() {
        assert!(parse_call_request(br#"{"floor": 2.5}"#).is_err());
        assert!(parse_call_request(br#"{"floor": 4294967296}"#).is_err());
    }

    #[test]
    fn parse_rejects_missing_floor_and_garbage() {
        assert!(parse_call_request(br#"{}"#).is_err());
        assert!(parse_call_request(b"").is_err());
        assert!(parse_call_request(b"floor=3").is_err());
    }

    #[test]
    fn error_display() {
        let err = RequestError::InvalidArgument("floor must be an integer".into());
        assert_eq!(err.to_string(), "invalid argument: floor must be an integer");
    }
}
