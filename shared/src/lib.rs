//! # Ticksync Shared
//! Tick-synchronized state replication & transport core, shared between
//! server & client hosts.
//!
//! The simulation records per-object state diffs and discrete events per
//! tick; connector interfaces carry them to the remote side either as direct
//! in-process calls, through thread-safe deferred-call queues, or as binary
//! packets (optionally over a simulated lossy/latent link).

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod backlog;
mod connection;
mod events;
mod protocol;
pub mod serde;
mod transport;
mod types;
mod world;

pub use backlog::state_manager::{BacklogEntry, BacklogVisitor, StateManager, MAX_BACKLOG};
pub use connection::{
    connector::{
        ActionState, ClientConnector, DownlinkConnector, ServerConnector, UplinkConnector,
    },
    queued::{QueuedDownlinkConnector, QueuedUplinkConnector},
};
pub use events::{
    error::EventError,
    event::{ActionEvent, EventVariant, ObjectAnimEvent, ObjectMessageEvent, TimedEvent},
    event_queue::{EventHandler, EventQueue},
};
pub use protocol::{
    error::ParseError,
    object_state_change_packet_size, object_state_change_payload_size,
    packet_builder::{OutgoingPacket, PacketBuilder},
    packet_parser::PacketParser,
    packet_type::{PacketType, Reliability},
    CONFIRM_PAYLOAD_SIZE, HEADER_SIZE, MAX_PAYLOAD_SIZE, STATE_HEADER_SIZE,
};
pub use transport::{error::TransportError, local_tunnel::LocalTunnel};
pub use types::{HostType, LevelObjectId, Tick, TICK_NONE};
pub use world::{
    object_states::{
        ObjectStates, StateFieldDef, StateUpdate, OBJECT_STATE_FIELDS, STATE_ALL, STATE_POSITION,
        STATE_ROTATION, STATE_SCALE, STATE_VISIBILITY,
    },
    sparse_transform::{
        SparseTransform, TRANSFORM_ROTATION, TRANSFORM_SCALE, TRANSFORM_TRANSLATION,
    },
    staged_value::StagedValue,
};
