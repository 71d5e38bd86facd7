//! Concurrency contract of the queued connectors: any number of producer
//! threads append while one consumer flushes; nothing is lost, duplicated or
//! reordered within a producer.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use glam::Vec2;

use ticksync_shared::{
    ActionState, DownlinkConnector, QueuedDownlinkConnector, QueuedUplinkConnector, Tick,
    UplinkConnector,
};
use ticksync_test::{DownlinkCallRecord, RecordingDownlink};

/// Validates every replayed call and counts it
struct CheckingUplink {
    observed: Arc<AtomicUsize>,
    mismatched: Arc<AtomicUsize>,
}

impl UplinkConnector for CheckingUplink {
    fn action_triggered(&mut self, code: u32, state: ActionState) {
        if code == 5 && state == ActionState::Pressed {
            self.observed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.mismatched.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn analog_action_triggered(&mut self, _code: u32, _axes: Vec2) {
        self.mismatched.fetch_add(1, Ordering::Relaxed);
    }

    fn acknowledge_snapshot(&mut self, _tick: Tick) {
        self.mismatched.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn one_thousand_calls_from_three_producers_all_arrive_exactly_once() {
    const PRODUCERS: usize = 3;
    const CALLS: [usize; PRODUCERS] = [334, 333, 333];

    let queued = QueuedUplinkConnector::new();
    let observed = Arc::new(AtomicUsize::new(0));
    let mismatched = Arc::new(AtomicUsize::new(0));
    let done = Arc::new(AtomicBool::new(false));

    // Consumer drains repeatedly while producers are still appending.
    let flusher = {
        let queued = queued.clone();
        let done = done.clone();
        let mut real = CheckingUplink {
            observed: observed.clone(),
            mismatched: mismatched.clone(),
        };
        thread::spawn(move || loop {
            queued.flush_queue(&mut real);
            if done.load(Ordering::Acquire) {
                break;
            }
            thread::yield_now();
        })
    };

    let producers: Vec<_> = CALLS
        .iter()
        .map(|&count| {
            let mut handle = queued.clone();
            thread::spawn(move || {
                for _ in 0..count {
                    handle.action_triggered(5, ActionState::Pressed);
                }
            })
        })
        .collect();

    for producer in producers {
        producer.join().expect("producer thread panicked");
    }
    done.store(true, Ordering::Release);
    flusher.join().expect("flusher thread panicked");

    // One final flush picks up anything appended after the last loop turn.
    let mut real = CheckingUplink {
        observed: observed.clone(),
        mismatched: mismatched.clone(),
    };
    queued.flush_queue(&mut real);

    assert_eq!(observed.load(Ordering::Relaxed), 1000);
    assert_eq!(mismatched.load(Ordering::Relaxed), 0);
    assert_eq!(queued.queued_len(), 0);
}

#[test]
fn downlink_flush_preserves_append_order() {
    let queued = QueuedDownlinkConnector::new();
    let mut handle = queued.clone();

    handle.load_level("levels/a.lvl");
    handle.spawn_object(ticksync_shared::LevelObjectId::new(1));
    handle.confirm_snapshot(3, 0.5, 0, None);

    let mut real = RecordingDownlink::new();
    let flushed = queued.flush_queue(&mut real);

    assert_eq!(flushed, 3);
    assert!(matches!(real.calls[0], DownlinkCallRecord::LoadLevel { .. }));
    assert!(matches!(real.calls[1], DownlinkCallRecord::Spawn { .. }));
    assert!(matches!(real.calls[2], DownlinkCallRecord::Confirm { .. }));
}

#[test]
fn calls_made_during_a_flush_survive_to_the_next_flush() {
    // The flush swaps the buffer out, so a producer appending concurrently
    // lands in the fresh buffer rather than being lost.
    let queued = QueuedUplinkConnector::new();
    let mut handle = queued.clone();
    handle.action_triggered(5, ActionState::Pressed);

    let observed = Arc::new(AtomicUsize::new(0));
    let mismatched = Arc::new(AtomicUsize::new(0));
    let mut real = CheckingUplink {
        observed: observed.clone(),
        mismatched: mismatched.clone(),
    };

    queued.flush_queue(&mut real);
    handle.action_triggered(5, ActionState::Pressed);
    queued.flush_queue(&mut real);

    assert_eq!(observed.load(Ordering::Relaxed), 2);
}
