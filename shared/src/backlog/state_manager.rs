use std::collections::VecDeque;

use crate::events::event::EventVariant;
use crate::types::{LevelObjectId, Tick};
use crate::world::sparse_transform::SparseTransform;

/// Ticks of history retained behind the current tick. Older buckets are
/// evicted as the recorder advances.
pub const MAX_BACKLOG: usize = 64;

/// One recorded simulation change, tagged by kind.
#[derive(Clone, Debug)]
pub enum BacklogEntry {
    ObjectTransform {
        object_id: LevelObjectId,
        transform: SparseTransform,
    },
    ActionEvent {
        realtime: f64,
        event: EventVariant,
    },
}

/// Replays recorded backlog entries. Every method has a default no-op body:
/// entry kinds added later flow through existing visitors without forcing a
/// rewrite, while a visitor that names a kind gets compile-checked against
/// its signature.
pub trait BacklogVisitor {
    fn object_transform(&mut self, _object_id: LevelObjectId, _transform: &SparseTransform) {}

    fn action_event(&mut self, _realtime: f64, _event: &EventVariant) {}
}

/// Bounded, indexable-by-tick history of recorded transform/event entries.
///
/// Only the owning simulation thread touches this structure. Recording
/// always targets the current tick; replay addresses any tick still inside
/// the retained window, both for ordinary advancement and for resimulation
/// after a correction.
pub struct StateManager {
    /// Oldest retained tick; `buckets[0]` belongs to it.
    front_tick: Tick,
    /// One bucket per retained tick, back() = current tick.
    buckets: VecDeque<Vec<BacklogEntry>>,
}

impl StateManager {
    pub fn new(start_tick: Tick) -> Self {
        let mut buckets = VecDeque::new();
        buckets.push_back(Vec::new());
        Self {
            front_tick: start_tick,
            buckets,
        }
    }

    /// The tick currently being recorded
    pub fn current_tick(&self) -> Tick {
        self.front_tick + (self.buckets.len() as Tick - 1)
    }

    /// Oldest tick still replayable
    pub fn front_tick(&self) -> Tick {
        self.front_tick
    }

    pub fn contains(&self, tick: Tick) -> bool {
        tick >= self.front_tick && tick <= self.current_tick()
    }

    /// Appends an event entry to the current tick's bucket
    pub fn add_action_event(&mut self, realtime: f64, event: EventVariant) {
        self.current_bucket().push(BacklogEntry::ActionEvent { realtime, event });
    }

    /// Appends a transform entry to the current tick's bucket
    pub fn add_object_transform(&mut self, object_id: LevelObjectId, transform: SparseTransform) {
        self.current_bucket()
            .push(BacklogEntry::ObjectTransform { object_id, transform });
    }

    fn current_bucket(&mut self) -> &mut Vec<BacklogEntry> {
        let Some(bucket) = self.buckets.back_mut() else {
            panic!("StateManager always retains the current tick's bucket");
        };
        bucket
    }

    /// Closes the current tick's bucket and begins the next one, evicting
    /// history older than [`MAX_BACKLOG`] ticks. Returns the new current
    /// tick.
    pub fn advance(&mut self) -> Tick {
        self.buckets.push_back(Vec::new());
        if self.buckets.len() > MAX_BACKLOG {
            self.buckets.pop_front();
            self.front_tick += 1;
        }
        self.current_tick()
    }

    /// Frees every bucket at or below the acknowledged tick. The current
    /// tick's bucket is never released.
    pub fn release_through(&mut self, tick: Tick) {
        while self.front_tick <= tick && self.buckets.len() > 1 {
            self.buckets.pop_front();
            self.front_tick += 1;
        }
    }

    /// Replays exactly the entries recorded for `tick`, in recorded order,
    /// through the visitor. Returns the number of entries replayed.
    ///
    /// # Panics
    ///
    /// Panics if `tick` is outside the retained window (evicted, released,
    /// or not yet recorded). That is a cadence desynchronization between
    /// caller and recorder, a logic bug, not a runtime condition to recover
    /// from.
    pub fn apply(&self, tick: Tick, visitor: &mut dyn BacklogVisitor) -> usize {
        if !self.contains(tick) {
            panic!(
                "StateManager::apply({}) outside retained window [{}, {}] - caller cadence has desynchronized from the recorder",
                tick,
                self.front_tick,
                self.current_tick()
            );
        }

        let bucket = &self.buckets[(tick - self.front_tick) as usize];
        for entry in bucket {
            match entry {
                BacklogEntry::ObjectTransform { object_id, transform } => {
                    visitor.object_transform(*object_id, transform);
                }
                BacklogEntry::ActionEvent { realtime, event } => {
                    visitor.action_event(*realtime, event);
                }
            }
        }
        bucket.len()
    }
}
