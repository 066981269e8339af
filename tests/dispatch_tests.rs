//! Integration tests for the dispatch loop on virtual time.
//!
//! `ProbeTimer` snapshots the car at every suspension point and can run a
//! hook there, which lets a test act "while the car is travelling" without
//! any real concurrency.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};

use lift_sim::hal::MockTimer;
use lift_sim::{
    ElevatorConfig, ElevatorController, ElevatorStatus, StartOutcome, Timer, TimingConfig,
};

type Hook = Box<dyn Fn(&ElevatorController<ProbeTimer>) + Send + Sync>;

#[derive(Default)]
struct Probe {
    controller: OnceLock<Weak<ElevatorController<ProbeTimer>>>,
    snapshots: Mutex<Vec<(u64, ElevatorStatus)>>,
    hook: Mutex<Option<Hook>>,
    now: AtomicU64,
}

#[derive(Clone, Default)]
struct ProbeTimer {
    probe: Arc<Probe>,
}

impl ProbeTimer {
    fn snapshots(&self) -> Vec<(u64, ElevatorStatus)> {
        self.probe.snapshots.lock().unwrap().clone()
    }

    fn on_delay(&self, hook: impl Fn(&ElevatorController<ProbeTimer>) + Send + Sync + 'static) {
        *self.probe.hook.lock().unwrap() = Some(Box::new(hook));
    }

    /// Floors at which the door was held open, in order.
    fn served_floors(&self, door_open_ms: u64) -> Vec<i32> {
        self.snapshots()
            .into_iter()
            .filter(|(ms, status)| *ms == door_open_ms && status.door_open)
            .map(|(_, status)| status.current_floor)
            .collect()
    }
}

impl Timer for ProbeTimer {
    fn now_ms(&self) -> u64 {
        self.probe.now.load(Ordering::SeqCst)
    }

    fn delay_ms(&self, ms: u64) -> impl Future<Output = ()> + Send {
        if let Some(controller) = self.probe.controller.get().and_then(Weak::upgrade) {
            self.probe
                .snapshots
                .lock()
                .unwrap()
                .push((ms, controller.status()));
            if let Some(hook) = self.probe.hook.lock().unwrap().as_ref() {
                hook(&controller);
            }
        }
        self.probe.now.fetch_add(ms, Ordering::SeqCst);
        std::future::ready(())
    }
}

/// Distinct durations so each snapshot can be attributed to its wait.
fn distinct_timing() -> TimingConfig {
    TimingConfig::default()
        .with_departure_close_ms(50)
        .with_travel_ms(100)
        .with_door_open_ms(200)
        .with_door_close_ms(300)
}

fn probed(config: ElevatorConfig) -> (Arc<ElevatorController<ProbeTimer>>, ProbeTimer) {
    let timer = ProbeTimer::default();
    let controller = Arc::new(ElevatorController::new(config, timer.clone()));
    let _ = timer.probe.controller.set(Arc::downgrade(&controller));
    (controller, timer)
}

fn mock() -> (ElevatorController<MockTimer>, MockTimer) {
    let timer = MockTimer::new();
    let controller = ElevatorController::new(ElevatorConfig::default(), timer.clone());
    (controller, timer)
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn nearest_floor_served_first() {
    let (controller, timer) = mock();
    controller.call(5).unwrap();
    controller.call(2).unwrap();

    assert_eq!(controller.start().await, StartOutcome::Completed);

    // 1 -> 2, serve, 2 -> 3 -> 4 -> 5, serve
    assert_eq!(
        timer.delays(),
        vec![1000, 2000, 1000, 1000, 1000, 1000, 2000, 1000]
    );
    assert_eq!(timer.now_ms(), 10_000);
}

#[tokio::test]
async fn nearest_first_visits_in_distance_order() {
    let timing = distinct_timing();
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(timing));
    for floor in [9, 2, 4, -1] {
        controller.call(floor).unwrap();
    }

    controller.start().await;

    // From 1: 2 (d=1), then 4 (d=2), then from 4: -1 (d=5) vs 9 (d=5) -> lower
    assert_eq!(timer.served_floors(timing.door_open_ms), vec![2, 4, -1, 9]);
}

#[tokio::test]
async fn call_during_travel_is_served_on_the_way() {
    let timing = distinct_timing();
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(timing));
    controller.call(5).unwrap();

    let called = AtomicBool::new(false);
    timer.on_delay(move |controller| {
        if controller.status().current_floor == 3 && !called.swap(true, Ordering::SeqCst) {
            controller.call(4).unwrap();
        }
    });

    assert_eq!(controller.start().await, StartOutcome::Completed);
    assert_eq!(timer.served_floors(timing.door_open_ms), vec![4, 5]);

    // Floor 4 is served while 5 is still pending
    let at_four = timer
        .snapshots()
        .into_iter()
        .find(|(ms, s)| *ms == timing.door_open_ms && s.current_floor == 4)
        .map(|(_, s)| s)
        .unwrap();
    assert_eq!(at_four.pending_requests, vec![5]);
}

#[tokio::test]
async fn call_behind_the_car_waits_for_nearer_floors() {
    let timing = distinct_timing();
    let (controller, timer) = probed(
        ElevatorConfig::default()
            .with_home_floor(5)
            .with_timing(timing),
    );
    controller.call(7).unwrap();

    let called = AtomicBool::new(false);
    timer.on_delay(move |controller| {
        let status = controller.status();
        if status.current_floor == 6 && !called.swap(true, Ordering::SeqCst) {
            controller.call(2).unwrap();
        }
    });

    controller.start().await;
    assert_eq!(timer.served_floors(timing.door_open_ms), vec![7, 2]);
    assert_eq!(controller.status().current_floor, 2);
}

#[tokio::test]
async fn nearer_call_behind_the_car_does_not_turn_it_around() {
    let timing = distinct_timing();
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(timing));
    controller.call(5).unwrap();

    let called = AtomicBool::new(false);
    timer.on_delay(move |controller| {
        if controller.status().current_floor == 3 && !called.swap(true, Ordering::SeqCst) {
            // One floor behind, two floors short of the target
            controller.call(2).unwrap();
        }
    });

    assert_eq!(controller.start().await, StartOutcome::Completed);
    assert_eq!(timer.served_floors(timing.door_open_ms), vec![5, 2]);

    let floors: Vec<i32> = timer
        .snapshots()
        .into_iter()
        .map(|(_, status)| status.current_floor)
        .collect();
    let reached_five = floors.iter().position(|&floor| floor == 5).unwrap();
    assert!(floors[..=reached_five].windows(2).all(|pair| pair[0] <= pair[1]));
}

// ============================================================================
// Idempotence and Termination
// ============================================================================

#[tokio::test]
async fn repeated_calls_give_one_visit() {
    let (controller, timer) = mock();
    for _ in 0..5 {
        controller.call(3).unwrap();
    }
    assert_eq!(controller.status().pending_requests, vec![3]);

    controller.start().await;
    assert_eq!(timer.delays(), vec![1000, 1000, 2000, 1000]);
}

#[tokio::test]
async fn call_for_pending_floor_mid_dispatch_is_noop() {
    let timing = distinct_timing();
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(timing));
    controller.call(4).unwrap();

    timer.on_delay(|controller| {
        if controller.status().current_floor < 4 {
            controller.call(4).unwrap();
        }
    });

    controller.start().await;
    assert_eq!(timer.served_floors(timing.door_open_ms), vec![4]);
}

#[tokio::test]
async fn dispatch_drains_every_request() {
    let (controller, _timer) = mock();
    for floor in [12, -3, 7, 0, 7, 1, 20] {
        controller.call(floor).unwrap();
    }

    assert_eq!(controller.start().await, StartOutcome::Completed);
    let status = controller.status();
    assert!(status.pending_requests.is_empty());
    assert!(!status.running);
    assert!(!status.door_open);
}

#[tokio::test]
async fn start_after_completion_is_noop() {
    let (controller, timer) = mock();
    controller.call(2).unwrap();
    controller.start().await;
    timer.clear_delays();

    assert_eq!(controller.start().await, StartOutcome::NoPendingRequests);
    assert!(timer.delays().is_empty());
}

// ============================================================================
// Door Invariants
// ============================================================================

#[tokio::test]
async fn door_never_open_while_changing_floors() {
    let timing = distinct_timing();
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(timing));
    for floor in [6, 3, -2] {
        controller.call(floor).unwrap();
    }

    controller.start().await;

    let snapshots = timer.snapshots();
    assert!(!snapshots.is_empty());
    for pair in snapshots.windows(2) {
        let (_, before) = &pair[0];
        let (_, after) = &pair[1];
        assert!(before.current_floor.abs_diff(after.current_floor) <= 1);
        if before.current_floor != after.current_floor {
            assert!(!before.door_open && !after.door_open);
        }
    }
    for (ms, status) in &snapshots {
        if *ms == timing.travel_ms {
            assert!(!status.door_open, "door open during travel: {:?}", status);
        }
    }
}

#[tokio::test]
async fn manual_open_mid_dispatch_is_closed_before_moving() {
    let timing = distinct_timing();
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(timing));
    controller.call(3).unwrap();

    let opened = AtomicBool::new(false);
    timer.on_delay(move |controller| {
        if controller.status().current_floor == 2 && !opened.swap(true, Ordering::SeqCst) {
            controller.open_door();
        }
    });

    assert_eq!(controller.start().await, StartOutcome::Completed);

    let delays: Vec<u64> = timer.snapshots().into_iter().map(|(ms, _)| ms).collect();
    assert_eq!(delays, vec![100, 300, 100, 200, 300]);
    assert_eq!(controller.status().current_floor, 3);
}

#[tokio::test]
async fn open_door_at_start_closes_before_departure() {
    let timing = distinct_timing();
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(timing));
    controller.open_door();
    controller.call(2).unwrap();

    controller.start().await;

    let (first_ms, first) = timer.snapshots()[0].clone();
    assert_eq!(first_ms, timing.departure_close_ms);
    assert!(!first.door_open);
    assert_eq!(first.current_floor, 1);
}

// ============================================================================
// Stop
// ============================================================================

#[tokio::test]
async fn stop_during_travel_halts_at_next_boundary() {
    let timing = distinct_timing();
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(timing));
    controller.call(5).unwrap();

    timer.on_delay(|controller| {
        if controller.status().current_floor == 3 {
            controller.stop();
        }
    });

    assert_eq!(controller.start().await, StartOutcome::Stopped);

    let status = controller.status();
    assert_eq!(status.current_floor, 3);
    assert!(!status.running);
    assert_eq!(status.pending_requests, vec![5]);
    // Nothing happened after the interrupted floor of travel
    assert_eq!(timer.snapshots().last().unwrap().1.current_floor, 3);
}

#[tokio::test]
async fn stop_during_door_dwell_leaves_door_open() {
    let timing = distinct_timing();
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(timing));
    controller.call(2).unwrap();
    controller.call(4).unwrap();

    timer.on_delay(move |controller| {
        if controller.status().door_open {
            controller.stop();
        }
    });

    assert_eq!(controller.start().await, StartOutcome::Stopped);

    let status = controller.status();
    assert_eq!(status.current_floor, 2);
    assert!(status.door_open);
    assert_eq!(status.pending_requests, vec![4]);
}

#[tokio::test]
async fn restart_after_stop_resumes_queue() {
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(distinct_timing()));
    controller.call(4).unwrap();

    let stopped = AtomicBool::new(false);
    timer.on_delay(move |controller| {
        if controller.status().current_floor == 2 && !stopped.swap(true, Ordering::SeqCst) {
            controller.stop();
        }
    });

    assert_eq!(controller.start().await, StartOutcome::Stopped);
    assert_eq!(controller.status().current_floor, 2);

    assert_eq!(controller.start().await, StartOutcome::Completed);
    assert_eq!(controller.status().current_floor, 4);
    assert!(controller.status().pending_requests.is_empty());
}

// ============================================================================
// Status
// ============================================================================

#[tokio::test]
async fn status_reports_running_while_dispatching() {
    let (controller, timer) = probed(ElevatorConfig::default().with_timing(distinct_timing()));
    controller.call(2).unwrap();

    controller.start().await;

    assert!(timer.snapshots().iter().all(|(_, s)| s.running));
    assert!(!controller.status().running);
}
