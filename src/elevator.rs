//! Car state machine.
//!
//! [`Elevator`] is the synchronous half of the core: it owns the car's
//! position, door, running flag and the set of pending floors, and exposes
//! the single-step primitives the dispatch loop in
//! [`ElevatorController`](crate::ElevatorController) strings together with
//! timed suspensions.
//!
//! # Overview
//!
//! - `call` queues a floor (duplicates are a no-op)
//! - `open_door` / `close_door` are manual overrides with no timing
//! - `stop` clears the running flag
//! - `status` returns a snapshot for UI/API
//!
//! Nothing in this module waits. Motion happens one floor per [`Elevator::step`]
//! so that time can be inserted between steps by whoever drives the car.
//!
//! # Example
//!
//! ```rust
//! use lift_sim::{CallOutcome, Elevator, Step};
//!
//! let mut elevator = Elevator::new(1);
//! assert_eq!(elevator.call(3), Ok(CallOutcome::Queued));
//! assert_eq!(elevator.call(3), Ok(CallOutcome::AlreadyPending));
//!
//! let ticket = elevator.begin_dispatch().unwrap();
//! assert_eq!(elevator.step(), Step::Moved { from: 1, to: 2, target: 3 });
//! assert_eq!(elevator.step(), Step::Moved { from: 2, to: 3, target: 3 });
//! assert!(elevator.serve_current_floor());
//! assert!(elevator.status().door_open);
//!
//! elevator.close_door();
//! assert_eq!(elevator.step(), Step::Drained);
//! assert!(elevator.finish_dispatch(&ticket));
//! assert!(!elevator.status().running);
//! ```

use core::cmp::Ordering;
use core::fmt;
use std::collections::BTreeSet;

use crate::config::ElevatorConfig;

// ============================================================================
// Outcomes and Errors
// ============================================================================

/// Result of a floor call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallOutcome {
    /// The floor was added to the pending set.
    Queued,
    /// The floor was already pending; nothing changed.
    AlreadyPending,
}

/// Result of a `start` request.
///
/// Only [`Completed`](Self::Completed) and [`Stopped`](Self::Stopped) come
/// from a dispatch loop that actually ran. The other two variants are
/// defined no-ops, never errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StartOutcome {
    /// The loop served every pending floor and went idle.
    Completed,
    /// The loop left early: `stop()` was called, or a newer dispatch took over.
    Stopped,
    /// A dispatch loop is already active; this call did not start another.
    AlreadyRunning,
    /// Nothing to do.
    NoPendingRequests,
}

/// Errors raised by the car itself.
///
/// Only reachable when floor bounds are configured; an unbounded car
/// accepts every floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElevatorError {
    /// The requested floor lies outside the configured bounds.
    FloorOutOfRange {
        /// Requested floor
        floor: i32,
        /// Lowest callable floor, if bounded below
        min: Option<i32>,
        /// Highest callable floor, if bounded above
        max: Option<i32>,
    },
}

impl fmt::Display for ElevatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevatorError::FloorOutOfRange { floor, min, max } => {
                write!(f, "floor {} is out of range", floor)?;
                match (min, max) {
                    (Some(min), Some(max)) => write!(f, " ({}..={})", min, max),
                    (Some(min), None) => write!(f, " (>= {})", min),
                    (None, Some(max)) => write!(f, " (<= {})", max),
                    (None, None) => Ok(()),
                }
            }
        }
    }
}

impl std::error::Error for ElevatorError {}

// ============================================================================
// Dispatch Primitives
// ============================================================================

/// Proof that a dispatch loop owns the car.
///
/// Issued by [`Elevator::begin_dispatch`]. A ticket stays valid until the
/// car is stopped or a newer ticket is issued.
#[derive(Debug)]
pub struct DispatchTicket {
    epoch: u64,
    closed_door: bool,
}

impl DispatchTicket {
    /// Whether `begin_dispatch` had to shut an open door, in which case the
    /// driver should wait out the departure close before moving.
    pub fn closed_door(&self) -> bool {
        self.closed_door
    }
}

/// What a single [`Elevator::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// No pending floors remain.
    Drained,
    /// The door was open (manual override), so it was shut instead of moving.
    DoorClosed,
    /// The car advanced one floor toward `target`.
    Moved {
        /// Floor before the step
        from: i32,
        /// Floor after the step
        to: i32,
        /// Floor the car is heading for
        target: i32,
    },
    /// The car is already at its target floor.
    AtTarget {
        /// Current floor
        floor: i32,
    },
}

/// Inclusive floor limits; either side may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FloorBounds {
    /// Lowest callable floor
    pub min: Option<i32>,
    /// Highest callable floor
    pub max: Option<i32>,
}

impl FloorBounds {
    /// Whether `floor` is callable.
    pub fn contains(&self, floor: i32) -> bool {
        self.min.map_or(true, |min| floor >= min) && self.max.map_or(true, |max| floor <= max)
    }
}

// ============================================================================
// Elevator
// ============================================================================

/// A single elevator car.
///
/// # Thread Safety
///
/// The car itself is not thread-safe. It is shared between the dispatch
/// loop and request handlers through
/// [`ElevatorController`](crate::ElevatorController), which wraps it in a
/// `Mutex` and never holds the lock across a suspension point.
#[derive(Clone, Debug)]
pub struct Elevator {
    current_floor: i32,
    door_open: bool,
    running: bool,
    pending: BTreeSet<i32>,
    target: Option<i32>,
    bounds: FloorBounds,
    epoch: u64,
}

impl Elevator {
    /// Create an idle car at `home_floor` with the door closed.
    pub fn new(home_floor: i32) -> Self {
        Self {
            current_floor: home_floor,
            door_open: false,
            running: false,
            pending: BTreeSet::new(),
            target: None,
            bounds: FloorBounds::default(),
            epoch: 0,
        }
    }

    /// Create a car from configuration (home floor and optional bounds).
    pub fn from_config(config: &ElevatorConfig) -> Self {
        Self::new(config.home_floor).with_bounds(FloorBounds {
            min: config.min_floor,
            max: config.max_floor,
        })
    }

    /// Restrict which floors may be called.
    pub fn with_bounds(mut self, bounds: FloorBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Queue a floor. Calling an already pending floor changes nothing.
    pub fn call(&mut self, floor: i32) -> Result<CallOutcome, ElevatorError> {
        if !self.bounds.contains(floor) {
            return Err(ElevatorError::FloorOutOfRange {
                floor,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }
        if self.pending.insert(floor) {
            Ok(CallOutcome::Queued)
        } else {
            Ok(CallOutcome::AlreadyPending)
        }
    }

    /// Manual override: open the door.
    pub fn open_door(&mut self) {
        self.door_open = true;
    }

    /// Manual override: close the door.
    pub fn close_door(&mut self) {
        self.door_open = false;
    }

    /// Clear the running flag. Returns whether a dispatch was active.
    ///
    /// The active loop notices at its next suspension point.
    pub fn stop(&mut self) -> bool {
        core::mem::replace(&mut self.running, false)
    }

    /// Get the current state for UI/API
    pub fn status(&self) -> ElevatorStatus {
        ElevatorStatus {
            current_floor: self.current_floor,
            door_open: self.door_open,
            running: self.running,
            pending_requests: self.pending.iter().copied().collect(),
        }
    }

    /// Get just the current floor
    pub fn current_floor(&self) -> i32 {
        self.current_floor
    }

    /// Check whether the door is open
    pub fn is_door_open(&self) -> bool {
        self.door_open
    }

    /// Check whether a dispatch loop is active
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Check whether `floor` is waiting to be served
    pub fn is_pending(&self, floor: i32) -> bool {
        self.pending.contains(&floor)
    }

    /// Floor the car is currently heading for, if one has been chosen
    pub fn target(&self) -> Option<i32> {
        self.target
    }

    /// Configured floor limits
    pub fn bounds(&self) -> FloorBounds {
        self.bounds
    }

    /// Pending floor closest to the car.
    ///
    /// Equidistant floors resolve to the lower one.
    pub fn nearest_request(&self) -> Option<i32> {
        let here = self.current_floor;
        // BTreeSet iterates ascending and min_by_key keeps the first minimum
        self.pending
            .iter()
            .copied()
            .min_by_key(|floor| floor.abs_diff(here))
    }

    /// Claim the car for a new dispatch loop.
    ///
    /// Fails with [`StartOutcome::AlreadyRunning`] or
    /// [`StartOutcome::NoPendingRequests`] without touching any state.
    /// On success the running flag is set and an open door is shut.
    pub fn begin_dispatch(&mut self) -> Result<DispatchTicket, StartOutcome> {
        if self.running {
            return Err(StartOutcome::AlreadyRunning);
        }
        if self.pending.is_empty() {
            return Err(StartOutcome::NoPendingRequests);
        }

        self.epoch = self.epoch.wrapping_add(1);
        self.running = true;
        self.target = None;
        let closed_door = core::mem::replace(&mut self.door_open, false);

        Ok(DispatchTicket {
            epoch: self.epoch,
            closed_door,
        })
    }

    /// Whether `ticket` still owns the car.
    pub fn is_dispatching(&self, ticket: &DispatchTicket) -> bool {
        self.running && self.epoch == ticket.epoch
    }

    /// Advance the car by at most one floor toward its target.
    ///
    /// The target is the nearest request at the time it is chosen and is
    /// kept until a stop is served, so the car never turns around on its way
    /// there. Pending floors it passes are still served through
    /// [`serve_current_floor`](Self::serve_current_floor).
    pub fn step(&mut self) -> Step {
        let kept = self.target.filter(|floor| self.pending.contains(floor));
        let Some(target) = kept.or_else(|| self.nearest_request()) else {
            self.target = None;
            return Step::Drained;
        };
        self.target = Some(target);

        // Never move with the door open
        if self.door_open {
            self.door_open = false;
            return Step::DoorClosed;
        }

        let from = self.current_floor;
        let to = match target.cmp(&from) {
            Ordering::Greater => from + 1,
            Ordering::Less => from - 1,
            Ordering::Equal => return Step::AtTarget { floor: from },
        };
        self.current_floor = to;

        Step::Moved { from, to, target }
    }

    /// Serve the current floor if it is pending: open the door and remove it.
    ///
    /// A served stop clears the target, so the next step picks the nearest
    /// request from here.
    pub fn serve_current_floor(&mut self) -> bool {
        if self.pending.remove(&self.current_floor) {
            self.door_open = true;
            self.target = None;
            true
        } else {
            false
        }
    }

    /// Release the car at the end of a dispatch loop.
    ///
    /// Returns `false` (and changes nothing) if the ticket was superseded or
    /// the car was already stopped.
    pub fn finish_dispatch(&mut self, ticket: &DispatchTicket) -> bool {
        if self.is_dispatching(ticket) {
            self.running = false;
            true
        } else {
            false
        }
    }
}

impl Default for Elevator {
    fn default() -> Self {
        Self::from_config(&ElevatorConfig::default())
    }
}

/// Full state snapshot for UI/API.
///
/// Serializes with camelCase keys (`currentFloor`, `doorOpen`, `running`,
/// `pendingRequests`) when the `serde` feature is enabled.
///
/// # Example
///
/// ```rust
/// use lift_sim::Elevator;
///
/// let mut elevator = Elevator::new(1);
/// elevator.call(4).unwrap();
/// elevator.call(2).unwrap();
///
/// let status = elevator.status();
/// assert_eq!(status.current_floor, 1);
/// assert!(!status.door_open);
/// assert!(!status.running);
/// assert_eq!(status.pending_requests, vec![2, 4]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ElevatorStatus {
    /// Floor occupied, or being entered while moving.
    pub current_floor: i32,
    /// Whether the door is open.
    pub door_open: bool,
    /// Whether a dispatch loop is active.
    pub running: bool,
    /// Unserved floors, ascending.
    pub pending_requests: Vec<i32>,
}
