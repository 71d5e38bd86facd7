use std::sync::{Arc, Mutex};

use glam::Vec2;

use super::connector::{ActionState, DownlinkConnector, UplinkConnector};
use crate::events::event::EventVariant;
use crate::types::{LevelObjectId, Tick};
use crate::world::object_states::StateUpdate;

// Queued connectors are the only sanctioned crossing point between the
// simulation thread and I/O threads. Each call is captured as one arm of a
// closed record enum and appended under the mutex; flushing swaps the buffer
// out in O(1) and replays outside the lock, so producers only ever wait for
// the swap, never for the replay. There is no back-pressure: bounding growth
// means flushing at least once per tick, and that is the caller's job.

#[derive(Clone, Debug)]
enum UplinkCall {
    ActionTriggered { code: u32, state: ActionState },
    AnalogActionTriggered { code: u32, axes: Vec2 },
    AcknowledgeSnapshot { tick: Tick },
}

#[derive(Clone, Debug)]
enum DownlinkCall {
    LoadLevel {
        path: String,
    },
    ObjectStatesChanged {
        tick: Tick,
        id: LevelObjectId,
        states: StateUpdate,
    },
    SpawnObject {
        id: LevelObjectId,
    },
    DespawnObject {
        id: LevelObjectId,
    },
    DestroyObject {
        id: LevelObjectId,
    },
    PostEvent {
        realtime: f64,
        event: EventVariant,
    },
    ConfirmSnapshot {
        tick: Tick,
        realtime: f64,
        discrete_change_count: u32,
        reference_tick: Option<Tick>,
    },
}

/// Thread-safe deferred-call buffer for the client-to-server direction.
///
/// Clone handles freely: all clones share one buffer. Any number of producer
/// threads may call connector methods concurrently; one consumer drains with
/// [`flush_queue`](QueuedUplinkConnector::flush_queue).
#[derive(Clone)]
pub struct QueuedUplinkConnector {
    queue: Arc<Mutex<Vec<UplinkCall>>>,
}

impl QueuedUplinkConnector {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn queued_len(&self) -> usize {
        let Ok(queue) = self.queue.lock() else {
            panic!("uplink call queue lock poisoned");
        };
        queue.len()
    }

    /// Swaps the buffer out under the lock, then replays every captured call
    /// against `real` in original append order. Returns the number of calls
    /// replayed.
    pub fn flush_queue(&self, real: &mut dyn UplinkConnector) -> usize {
        let drained = {
            let Ok(mut queue) = self.queue.lock() else {
                panic!("uplink call queue lock poisoned");
            };
            std::mem::take(&mut *queue)
        };

        let count = drained.len();
        for call in drained {
            match call {
                UplinkCall::ActionTriggered { code, state } => real.action_triggered(code, state),
                UplinkCall::AnalogActionTriggered { code, axes } => {
                    real.analog_action_triggered(code, axes)
                }
                UplinkCall::AcknowledgeSnapshot { tick } => real.acknowledge_snapshot(tick),
            }
        }
        count
    }

    fn push(&self, call: UplinkCall) {
        let Ok(mut queue) = self.queue.lock() else {
            panic!("uplink call queue lock poisoned");
        };
        queue.push(call);
    }
}

impl Default for QueuedUplinkConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl UplinkConnector for QueuedUplinkConnector {
    fn action_triggered(&mut self, code: u32, state: ActionState) {
        self.push(UplinkCall::ActionTriggered { code, state });
    }

    fn analog_action_triggered(&mut self, code: u32, axes: Vec2) {
        self.push(UplinkCall::AnalogActionTriggered { code, axes });
    }

    fn acknowledge_snapshot(&mut self, tick: Tick) {
        self.push(UplinkCall::AcknowledgeSnapshot { tick });
    }
}

/// Thread-safe deferred-call buffer for the server-to-client direction
#[derive(Clone)]
pub struct QueuedDownlinkConnector {
    queue: Arc<Mutex<Vec<DownlinkCall>>>,
}

impl QueuedDownlinkConnector {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn queued_len(&self) -> usize {
        let Ok(queue) = self.queue.lock() else {
            panic!("downlink call queue lock poisoned");
        };
        queue.len()
    }

    /// See [`QueuedUplinkConnector::flush_queue`]
    pub fn flush_queue(&self, real: &mut dyn DownlinkConnector) -> usize {
        let drained = {
            let Ok(mut queue) = self.queue.lock() else {
                panic!("downlink call queue lock poisoned");
            };
            std::mem::take(&mut *queue)
        };

        let count = drained.len();
        for call in drained {
            match call {
                DownlinkCall::LoadLevel { path } => real.load_level(&path),
                DownlinkCall::ObjectStatesChanged { tick, id, states } => {
                    real.object_states_changed(tick, id, &states)
                }
                DownlinkCall::SpawnObject { id } => real.spawn_object(id),
                DownlinkCall::DespawnObject { id } => real.despawn_object(id),
                DownlinkCall::DestroyObject { id } => real.destroy_object(id),
                DownlinkCall::PostEvent { realtime, event } => real.post_event(realtime, &event),
                DownlinkCall::ConfirmSnapshot {
                    tick,
                    realtime,
                    discrete_change_count,
                    reference_tick,
                } => real.confirm_snapshot(tick, realtime, discrete_change_count, reference_tick),
            }
        }
        count
    }

    fn push(&self, call: DownlinkCall) {
        let Ok(mut queue) = self.queue.lock() else {
            panic!("downlink call queue lock poisoned");
        };
        queue.push(call);
    }
}

impl Default for QueuedDownlinkConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl DownlinkConnector for QueuedDownlinkConnector {
    fn load_level(&mut self, path: &str) {
        self.push(DownlinkCall::LoadLevel {
            path: path.to_string(),
        });
    }

    fn object_states_changed(&mut self, tick: Tick, id: LevelObjectId, states: &StateUpdate) {
        self.push(DownlinkCall::ObjectStatesChanged {
            tick,
            id,
            states: *states,
        });
    }

    fn spawn_object(&mut self, id: LevelObjectId) {
        self.push(DownlinkCall::SpawnObject { id });
    }

    fn despawn_object(&mut self, id: LevelObjectId) {
        self.push(DownlinkCall::DespawnObject { id });
    }

    fn destroy_object(&mut self, id: LevelObjectId) {
        self.push(DownlinkCall::DestroyObject { id });
    }

    fn post_event(&mut self, realtime: f64, event: &EventVariant) {
        self.push(DownlinkCall::PostEvent {
            realtime,
            event: event.clone(),
        });
    }

    fn confirm_snapshot(
        &mut self,
        tick: Tick,
        realtime: f64,
        discrete_change_count: u32,
        reference_tick: Option<Tick>,
    ) {
        self.push(DownlinkCall::ConfirmSnapshot {
            tick,
            realtime,
            discrete_change_count,
            reference_tick,
        });
    }
}
