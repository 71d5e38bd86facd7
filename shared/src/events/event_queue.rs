use log::warn;

use super::error::EventError;
use super::event::{ActionEvent, EventVariant, ObjectAnimEvent, ObjectMessageEvent, TimedEvent};

/// Receives dispatched events. One method per known kind, each defaulted to
/// a no-op, so handlers implement only what they care about and new kinds
/// never break existing impls.
pub trait EventHandler {
    fn action(&mut self, _event: &ActionEvent) -> Result<(), EventError> {
        Ok(())
    }

    fn object_anim(&mut self, _event: &ObjectAnimEvent) -> Result<(), EventError> {
        Ok(())
    }

    fn object_message(&mut self, _event: &ObjectMessageEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// Time-ordered buffer and single-dispatch engine for discrete events.
///
/// Incoming events insert at their realtime position even when they arrive
/// out of order; dispatch walks the buffer front and fires each event
/// exactly once.
pub struct EventQueue {
    /// Sorted by realtime; equal timestamps keep insertion order.
    pending: Vec<TimedEvent>,
    /// Events already processed locally, retained only for replication.
    processed_log: Vec<TimedEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            processed_log: Vec::new(),
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Inserts an event at its realtime position (upper-bound search), so
    /// jittered arrivals still land at the correct logical spot while equal
    /// timestamps stay FIFO.
    pub fn add_incoming_event(&mut self, realtime: f64, event: EventVariant) {
        let index = self.pending.partition_point(|entry| entry.realtime <= realtime);
        self.pending.insert(index, TimedEvent { realtime, event });
    }

    /// Records an event whose authoritative effect already happened locally,
    /// purely so it can later be serialized to the remote side. Logged
    /// events are never re-dispatched here.
    pub fn log_event(&mut self, event: EventVariant, realtime: f64) {
        self.processed_log.push(TimedEvent { realtime, event });
    }

    /// Drains the processed-event log for replication
    pub fn take_log(&mut self) -> Vec<TimedEvent> {
        std::mem::take(&mut self.processed_log)
    }

    /// Fires every pending event with timestamp <= `realtime`, in timestamp
    /// order with FIFO tie-break, each exactly once. The first entry beyond
    /// `realtime` stops the walk without being consumed.
    ///
    /// A handler error drops that single event with a warning; dispatch
    /// continues with the next.
    ///
    /// Returns the number of events fired (dropped ones included).
    pub fn dispatch(&mut self, realtime: f64, handler: &mut dyn EventHandler) -> usize {
        let due = self.pending.partition_point(|entry| entry.realtime <= realtime);
        let mut fired = 0;

        for entry in self.pending.drain(..due) {
            let result = match &entry.event {
                EventVariant::Action(event) => handler.action(event),
                EventVariant::ObjectAnim(event) => handler.object_anim(event),
                EventVariant::ObjectMessage(event) => handler.object_message(event),
            };
            if let Err(error) = result {
                warn!(
                    "dropping event at t={}: {} ({:?})",
                    entry.realtime, error, entry.event
                );
            }
            fired += 1;
        }

        fired
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
