//! Configuration for the elevator core and the HTTP gateway.
//!
//! Every field has a default, so an empty TOML file (or none at all) gives a
//! working single-car simulation starting at floor 1 with the standard
//! door and travel timings.
//!
//! # Example
//!
//! ```rust
//! use lift_sim::config::{Config, ElevatorConfig, TimingConfig, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.elevator.home_floor, 1);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_elevator(
//!         ElevatorConfig::default()
//!             .with_bounds(-2, 12)
//!             .with_timing(TimingConfig::default().with_travel_ms(400)),
//!     )
//!     .with_web(WebConfig::default().with_port(8080));
//! assert!(config.validate().is_ok());
//! ```

use core::fmt;

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Car and dispatch configuration
    pub elevator: ElevatorConfig,
    /// Web server configuration
    pub web: WebConfig,
}

impl Config {
    /// Set elevator configuration
    pub fn with_elevator(mut self, elevator: ElevatorConfig) -> Self {
        self.elevator = elevator;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.elevator.validate()
    }

    /// Parse configuration from TOML text and validate it.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    #[cfg(feature = "config-file")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}

// ============================================================================
// Elevator Config
// ============================================================================

/// Car configuration
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ElevatorConfig {
    /// Floor the car occupies at process start
    pub home_floor: i32,
    /// Lowest callable floor (unbounded when unset)
    pub min_floor: Option<i32>,
    /// Highest callable floor (unbounded when unset)
    pub max_floor: Option<i32>,
    /// Modeled durations of the dispatch loop
    pub timing: TimingConfig,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            home_floor: 1,
            min_floor: None,
            max_floor: None,
            timing: TimingConfig::default(),
        }
    }
}

impl ElevatorConfig {
    /// Set the home floor
    pub fn with_home_floor(mut self, floor: i32) -> Self {
        self.home_floor = floor;
        self
    }

    /// Restrict calls to `min..=max`
    pub fn with_bounds(mut self, min: i32, max: i32) -> Self {
        self.min_floor = Some(min);
        self.max_floor = Some(max);
        self
    }

    /// Set the dispatch timings
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Reject inverted bounds and a home floor outside them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let (Some(min), Some(max)) = (self.min_floor, self.max_floor) {
            if min > max {
                return Err(ConfigError::InvalidBounds { min, max });
            }
        }
        let below = self.min_floor.is_some_and(|min| self.home_floor < min);
        let above = self.max_floor.is_some_and(|max| self.home_floor > max);
        if below || above {
            return Err(ConfigError::HomeFloorOutOfRange {
                home_floor: self.home_floor,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Timing Config
// ============================================================================

/// Modeled durations, in milliseconds, of each dispatch suspension point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Door closing when `start` finds it open
    pub departure_close_ms: u64,
    /// Transit between adjacent floors
    pub travel_ms: u64,
    /// Door held open at a served stop
    pub door_open_ms: u64,
    /// Door closing after a served stop
    pub door_close_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            departure_close_ms: 500,
            travel_ms: 1000,
            door_open_ms: 2000,
            door_close_ms: 1000,
        }
    }
}

impl TimingConfig {
    /// Set the pre-departure door close duration
    pub fn with_departure_close_ms(mut self, ms: u64) -> Self {
        self.departure_close_ms = ms;
        self
    }

    /// Set the inter-floor travel duration
    pub fn with_travel_ms(mut self, ms: u64) -> Self {
        self.travel_ms = ms;
        self
    }

    /// Set the door dwell duration
    pub fn with_door_open_ms(mut self, ms: u64) -> Self {
        self.door_open_ms = ms;
        self
    }

    /// Set the post-stop door close duration
    pub fn with_door_close_ms(mut self, ms: u64) -> Self {
        self.door_close_ms = ms;
        self
    }

    /// Time spent at one served stop (dwell plus close).
    pub fn stop_cycle_ms(&self) -> u64 {
        self.door_open_ms + self.door_close_ms
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web server configuration
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_permissive: true,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Reasons a configuration cannot be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(String),
    /// The configuration text is not valid TOML for [`Config`].
    Parse(String),
    /// `min_floor` is greater than `max_floor`.
    InvalidBounds {
        /// Configured lower bound
        min: i32,
        /// Configured upper bound
        max: i32,
    },
    /// The home floor lies outside the configured bounds.
    HomeFloorOutOfRange {
        /// Configured home floor
        home_floor: i32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "failed to read configuration: {}", msg),
            ConfigError::Parse(msg) => write!(f, "failed to parse configuration: {}", msg),
            ConfigError::InvalidBounds { min, max } => {
                write!(f, "min_floor {} is above max_floor {}", min, max)
            }
            ConfigError::HomeFloorOutOfRange { home_floor } => {
                write!(f, "home_floor {} is outside the configured bounds", home_floor)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Tests
// ============================================================================
