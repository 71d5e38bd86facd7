use std::collections::VecDeque;

use glam::Vec2;
use log::warn;

use super::packet_type::{PacketType, Reliability};
use super::{MAX_PAYLOAD_SIZE, SNAP_FLAG_RUNNING, SNAP_FLAG_VISIBILITY};
use crate::connection::connector::{ActionState, DownlinkConnector, UplinkConnector};
use crate::events::event::EventVariant;
use crate::serde::{ByteWriter, Serde};
use crate::types::{LevelObjectId, Tick, TICK_NONE};
use crate::world::object_states::{
    StateUpdate, STATE_ALL, STATE_POSITION, STATE_ROTATION, STATE_SCALE, STATE_VISIBILITY,
};

/// One finished wire packet, tagged with the delivery class its type
/// requires
#[derive(Clone, Debug)]
pub struct OutgoingPacket {
    pub reliability: Reliability,
    pub bytes: Vec<u8>,
}

/// Serializes connector calls into self-delimiting packets.
///
/// Implements both connector interfaces, so a host talks to a
/// `PacketBuilder` exactly as it would talk to a direct in-process
/// connector; each call appends one packet to the outgoing queue.
pub struct PacketBuilder {
    outgoing: VecDeque<OutgoingPacket>,
    packets_built: u64,
}

impl PacketBuilder {
    pub fn new() -> Self {
        Self {
            outgoing: VecDeque::new(),
            packets_built: 0,
        }
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    pub fn packets_built(&self) -> u64 {
        self.packets_built
    }

    /// Drains every finished packet, in call order
    pub fn take_outgoing(&mut self) -> Vec<OutgoingPacket> {
        self.outgoing.drain(..).collect()
    }

    fn finish(&mut self, packet_type: PacketType, payload: ByteWriter) {
        let payload = payload.to_bytes();
        if payload.len() > MAX_PAYLOAD_SIZE {
            warn!(
                "discarding oversize {:?} packet: {} byte payload exceeds {}",
                packet_type,
                payload.len(),
                MAX_PAYLOAD_SIZE
            );
            return;
        }

        let mut bytes = Vec::with_capacity(super::HEADER_SIZE + payload.len());
        bytes.push(packet_type.to_byte());
        bytes.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&payload);

        self.packets_built += 1;
        self.outgoing.push_back(OutgoingPacket {
            reliability: packet_type.reliability(),
            bytes,
        });
    }
}

impl Default for PacketBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UplinkConnector for PacketBuilder {
    fn action_triggered(&mut self, code: u32, state: ActionState) {
        let mut payload = ByteWriter::new();
        code.ser(&mut payload);
        state.ser(&mut payload);
        self.finish(PacketType::ActionTriggered, payload);
    }

    fn analog_action_triggered(&mut self, code: u32, axes: Vec2) {
        let mut payload = ByteWriter::new();
        code.ser(&mut payload);
        axes.ser(&mut payload);
        self.finish(PacketType::AnalogActionTriggered, payload);
    }

    fn acknowledge_snapshot(&mut self, tick: Tick) {
        let mut payload = ByteWriter::new();
        tick.ser(&mut payload);
        self.finish(PacketType::AcknowledgeSnapshot, payload);
    }
}

impl DownlinkConnector for PacketBuilder {
    fn load_level(&mut self, path: &str) {
        let mut payload = ByteWriter::new();
        path.to_string().ser(&mut payload);
        self.finish(PacketType::LoadLevel, payload);
    }

    fn object_states_changed(&mut self, tick: Tick, id: LevelObjectId, states: &StateUpdate) {
        // Payload size must stay a pure function of the written mask.
        let flags = states.flags & STATE_ALL;

        let mut payload = ByteWriter::new();
        tick.ser(&mut payload);
        id.ser(&mut payload);
        flags.ser(&mut payload);

        if flags & STATE_POSITION != 0 {
            states.position.ser(&mut payload);
        }
        if flags & STATE_ROTATION != 0 {
            states.rotation.ser(&mut payload);
        }
        if flags & STATE_SCALE != 0 {
            states.scale.ser(&mut payload);
        }
        if flags & STATE_VISIBILITY != 0 {
            let mut snap_flags = 0u8;
            if states.visibility {
                snap_flags |= SNAP_FLAG_VISIBILITY;
            }
            if states.running {
                snap_flags |= SNAP_FLAG_RUNNING;
            }
            payload.write_u8(snap_flags);
        }

        self.finish(PacketType::ObjectStateChanged, payload);
    }

    fn spawn_object(&mut self, id: LevelObjectId) {
        let mut payload = ByteWriter::new();
        id.ser(&mut payload);
        self.finish(PacketType::SpawnObject, payload);
    }

    fn despawn_object(&mut self, id: LevelObjectId) {
        let mut payload = ByteWriter::new();
        id.ser(&mut payload);
        self.finish(PacketType::DespawnObject, payload);
    }

    fn destroy_object(&mut self, id: LevelObjectId) {
        let mut payload = ByteWriter::new();
        id.ser(&mut payload);
        self.finish(PacketType::DestroyObject, payload);
    }

    fn post_event(&mut self, realtime: f64, event: &EventVariant) {
        let mut payload = ByteWriter::new();
        realtime.ser(&mut payload);
        event.ser(&mut payload);
        self.finish(PacketType::Event, payload);
    }

    fn confirm_snapshot(
        &mut self,
        tick: Tick,
        realtime: f64,
        discrete_change_count: u32,
        reference_tick: Option<Tick>,
    ) {
        let mut payload = ByteWriter::new();
        tick.ser(&mut payload);
        realtime.ser(&mut payload);
        discrete_change_count.ser(&mut payload);
        reference_tick.unwrap_or(TICK_NONE).ser(&mut payload);
        self.finish(PacketType::ConfirmSnapshot, payload);
    }
}
