//! Shared elevator controller and its dispatch loop.
//!
//! [`ElevatorController`] is the one owner of the car. It wraps an
//! [`Elevator`] in a `Mutex` so request handlers and the dispatch loop can
//! share it through an `Arc`, and it drives the loop with a [`Timer`] so the
//! same code runs on real time and on a virtual clock.
//!
//! # Dispatch Loop
//!
//! [`ElevatorController::start`] claims the car and then repeats:
//!
//! 1. Move one floor toward the target (the nearest pending floor, kept
//!    until a stop is served)
//! 2. Wait `travel_ms`
//! 3. If the car is now on a pending floor: open the door, drop the floor
//!    from the queue, wait `door_open_ms`, close the door, wait `door_close_ms`
//!
//! until nothing is pending. Ownership of the car is re-checked after every
//! wait, so [`ElevatorController::stop`] takes effect at the next step
//! boundary rather than after the whole queue.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lift_sim::{ElevatorController, ElevatorConfig, StartOutcome};
//! use lift_sim::hal::MockTimer;
//!
//! # tokio_test_block_on(async {
//! let controller = Arc::new(ElevatorController::new(ElevatorConfig::default(), MockTimer::new()));
//!
//! controller.call(5).unwrap();
//! controller.call(2).unwrap();
//! assert_eq!(controller.start().await, StartOutcome::Completed);
//!
//! let status = controller.status();
//! assert_eq!(status.current_floor, 5);
//! assert!(status.pending_requests.is_empty());
//! assert!(!status.running);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};

use crate::config::{ConfigError, ElevatorConfig, TimingConfig};
use crate::elevator::{
    CallOutcome, DispatchTicket, Elevator, ElevatorError, ElevatorStatus, StartOutcome, Step,
};
use crate::traits::Timer;

/// Owner of the car state and runner of the dispatch loop.
///
/// # Thread Safety
///
/// - All synchronous operations lock the car briefly and return.
/// - The dispatch loop locks only between suspension points, so `call`,
///   `stop` and `status` are never blocked by a door dwell or a floor of
///   travel.
/// - At most one loop owns the car at a time. A loop that loses ownership
///   (via `stop`, possibly followed by a fresh `start`) exits at its next
///   step without touching the car again.
///
/// The car itself is reachable only through these operations:
///
/// ```compile_fail
/// use lift_sim::{ElevatorConfig, ElevatorController};
/// use lift_sim::hal::MockTimer;
///
/// let controller = ElevatorController::new(ElevatorConfig::default(), MockTimer::new());
/// controller.with_elevator(|elevator| elevator.stop());
/// ```
pub struct ElevatorController<T: Timer> {
    elevator: Mutex<Elevator>,
    timer: T,
    timing: TimingConfig,
}

impl<T: Timer> ElevatorController<T> {
    /// Create a controller for a car built from `config`.
    ///
    /// `config` is taken as given. Inverted bounds yield a car that rejects
    /// every call; use [`try_new`](Self::try_new) for configuration that has
    /// not been through [`ElevatorConfig::validate`].
    pub fn new(config: ElevatorConfig, timer: T) -> Self {
        Self::from_elevator(Elevator::from_config(&config), config.timing, timer)
    }

    /// Validate `config`, then create a controller for it.
    pub fn try_new(config: ElevatorConfig, timer: T) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, timer))
    }

    /// Create a controller around an existing car.
    pub fn from_elevator(elevator: Elevator, timing: TimingConfig, timer: T) -> Self {
        Self {
            elevator: Mutex::new(elevator),
            timer,
            timing,
        }
    }

    /// The timer driving the dispatch loop.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Modeled durations used by the dispatch loop.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Current time according to the controller's timer.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.timer.now_ms()
    }

    /// Access the car with the lock held.
    ///
    /// The closure pattern prevents accidentally holding the lock across
    /// await points.
    fn with_elevator<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Elevator) -> R,
    {
        // Elevator methods never panic midway, so a poisoned lock still
        // guards consistent state
        let mut guard = self.elevator.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Queue a floor. Does not start the car.
    pub fn call(&self, floor: i32) -> Result<CallOutcome, ElevatorError> {
        let outcome = self.with_elevator(|elevator| elevator.call(floor));
        match &outcome {
            Ok(CallOutcome::Queued) => debug!("floor {} queued", floor),
            Ok(CallOutcome::AlreadyPending) => debug!("floor {} already pending", floor),
            Err(e) => debug!("call rejected: {}", e),
        }
        outcome
    }

    /// Manual override: open the door immediately.
    pub fn open_door(&self) {
        self.with_elevator(Elevator::open_door);
    }

    /// Manual override: close the door immediately.
    pub fn close_door(&self) {
        self.with_elevator(Elevator::close_door);
    }

    /// Ask the active dispatch loop to halt. Returns whether one was active.
    ///
    /// The loop halts at its next suspension point; a floor of travel or a
    /// door wait already in progress runs to its end first.
    pub fn stop(&self) -> bool {
        let was_running = self.with_elevator(Elevator::stop);
        if was_running {
            info!("stop requested at floor {}", self.status().current_floor);
        }
        was_running
    }

    /// Get a read-only state snapshot.
    pub fn status(&self) -> ElevatorStatus {
        self.with_elevator(|elevator| elevator.status())
    }

    /// Claim the car for a dispatch loop without running it.
    ///
    /// Returns the no-op outcome (`AlreadyRunning` or `NoPendingRequests`)
    /// when the car cannot be claimed. Pair with [`run`](Self::run), e.g.
    /// to answer an HTTP request before spawning the loop.
    pub fn begin(&self) -> Result<DispatchTicket, StartOutcome> {
        let claim = self.with_elevator(Elevator::begin_dispatch);
        if let Err(outcome) = &claim {
            debug!("start ignored: {:?}", outcome);
        }
        claim
    }

    /// Claim the car and run the dispatch loop until the queue drains or
    /// the loop is stopped.
    pub async fn start(&self) -> StartOutcome {
        match self.begin() {
            Ok(ticket) => self.run(ticket).await,
            Err(outcome) => outcome,
        }
    }

    /// Run the dispatch loop for a ticket obtained from [`begin`](Self::begin).
    pub async fn run(&self, ticket: DispatchTicket) -> StartOutcome {
        info!(
            "[{}ms] dispatch started at floor {}",
            self.now_ms(),
            self.status().current_floor
        );

        if ticket.closed_door() {
            self.timer.delay_ms(self.timing.departure_close_ms).await;
        }

        loop {
            let step = self.while_dispatching(&ticket, |elevator| {
                let step = elevator.step();
                if step == Step::Drained {
                    elevator.finish_dispatch(&ticket);
                }
                step
            });

            match step {
                None => return self.halted(),
                Some(Step::Drained) => {
                    info!("[{}ms] dispatch complete", self.now_ms());
                    return StartOutcome::Completed;
                }
                Some(Step::DoorClosed) => {
                    warn!("door was open during dispatch, closing before travel");
                    self.timer.delay_ms(self.timing.door_close_ms).await;
                }
                Some(Step::Moved { from, to, target }) => {
                    debug!(
                        "[{}ms] floor {} -> {} (target {})",
                        self.now_ms(),
                        from,
                        to,
                        target
                    );
                    self.timer.delay_ms(self.timing.travel_ms).await;
                    if !self.serve_stop(&ticket).await {
                        return self.halted();
                    }
                }
                Some(Step::AtTarget { .. }) => {
                    if !self.serve_stop(&ticket).await {
                        return self.halted();
                    }
                }
            }
        }
    }

    /// Run `f` on the car only if `ticket` still owns it.
    fn while_dispatching<R, F>(&self, ticket: &DispatchTicket, f: F) -> Option<R>
    where
        F: FnOnce(&mut Elevator) -> R,
    {
        self.with_elevator(|elevator| elevator.is_dispatching(ticket).then(|| f(elevator)))
    }

    /// Door cycle at the current floor if it is pending.
    ///
    /// Returns `false` once the ticket has lost the car.
    async fn serve_stop(&self, ticket: &DispatchTicket) -> bool {
        let Some(served) = self.while_dispatching(ticket, Elevator::serve_current_floor) else {
            return false;
        };
        if !served {
            return true;
        }

        info!(
            "[{}ms] serving floor {}",
            self.now_ms(),
            self.status().current_floor
        );
        self.timer.delay_ms(self.timing.door_open_ms).await;

        if self
            .while_dispatching(ticket, Elevator::close_door)
            .is_none()
        {
            return false;
        }
        self.timer.delay_ms(self.timing.door_close_ms).await;
        true
    }

    fn halted(&self) -> StartOutcome {
        info!("[{}ms] dispatch halted", self.now_ms());
        StartOutcome::Stopped
    }
}
