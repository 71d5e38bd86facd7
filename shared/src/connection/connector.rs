use glam::Vec2;

use crate::events::event::EventVariant;
use crate::serde::{ByteReader, ByteWriter, Serde, SerdeError};
use crate::types::{LevelObjectId, Tick};
use crate::world::object_states::StateUpdate;
use crate::world::sparse_transform::SparseTransform;

/// Edge state of a digital action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionState {
    Pressed,
    Released,
}

impl Serde for ActionState {
    fn ser(&self, writer: &mut ByteWriter) {
        let tag: u8 = match self {
            ActionState::Pressed => 1,
            ActionState::Released => 0,
        };
        writer.write_u8(tag);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        match reader.read_u8()? {
            0 => Ok(ActionState::Released),
            1 => Ok(ActionState::Pressed),
            tag => Err(SerdeError::UnknownVariant { tag }),
        }
    }
}

// The connector interfaces are the serialization-agnostic boundary of the
// core. Every method argument is an id, a POD, a small value struct or a
// string - never a pointer into the caller's live object graph - because any
// implementation may be a remote, byte-serialized call.

/// Client-to-server calls
pub trait UplinkConnector {
    fn action_triggered(&mut self, code: u32, state: ActionState);

    fn analog_action_triggered(&mut self, code: u32, axes: Vec2);

    /// Reports the highest tick this client has fully applied. Bounds the
    /// server's retained history; a later ack supersedes an earlier one.
    fn acknowledge_snapshot(&mut self, tick: Tick);
}

/// Server-to-client calls
pub trait DownlinkConnector {
    fn load_level(&mut self, path: &str);

    /// Committed-state snapshot of one object, restricted to the fields
    /// masked in `states.flags`.
    fn object_states_changed(&mut self, tick: Tick, id: LevelObjectId, states: &StateUpdate);

    fn spawn_object(&mut self, id: LevelObjectId);

    fn despawn_object(&mut self, id: LevelObjectId);

    fn destroy_object(&mut self, id: LevelObjectId);

    /// A replicated discrete event, destined for the client's event queue
    /// at `realtime`.
    fn post_event(&mut self, realtime: f64, event: &EventVariant);

    /// Completes the snapshot for `tick`: it carried
    /// `discrete_change_count` posted events, and was optionally
    /// delta-encoded against `reference_tick`.
    fn confirm_snapshot(
        &mut self,
        tick: Tick,
        realtime: f64,
        discrete_change_count: u32,
        reference_tick: Option<Tick>,
    );
}

/// The server host's inward-facing surface. It receives uplink traffic plus
/// the simulation's already-diffed deltas; translating those deltas into the
/// committed-state snapshots the downlink speaks is the server's job, never
/// the transport's.
pub trait ServerConnector: UplinkConnector {
    fn object_transformed(&mut self, tick: Tick, id: LevelObjectId, transform: &SparseTransform);
}

/// The client host's inward-facing surface: the snapshot-speaking dual of
/// [`ServerConnector`]. Everything it consumes already arrives through the
/// downlink vocabulary.
pub trait ClientConnector: DownlinkConnector {}
