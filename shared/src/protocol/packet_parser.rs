use glam::{Quat, Vec2, Vec3};
use log::warn;

use super::error::ParseError;
use super::packet_type::PacketType;
use super::{
    object_state_change_payload_size, CONFIRM_PAYLOAD_SIZE, HEADER_SIZE, SNAP_FLAG_RUNNING,
    SNAP_FLAG_VISIBILITY,
};
use crate::connection::connector::{ActionState, DownlinkConnector, UplinkConnector};
use crate::events::event::EventVariant;
use crate::serde::{ByteReader, Serde};
use crate::types::{HostType, LevelObjectId, Tick, TICK_NONE};
use crate::world::object_states::{
    StateUpdate, STATE_ALL, STATE_POSITION, STATE_ROTATION, STATE_SCALE, STATE_VISIBILITY,
};

/// Decodes wire packets and replays them as connector calls.
///
/// This is the trust boundary for remote input: every size, type byte and
/// mask is validated before any field is believed. A packet that fails
/// validation is logged, counted and dropped; the error never escalates
/// past the parser, and the receiving host simply keeps its last known
/// state.
pub struct PacketParser {
    packets_parsed: u64,
    packets_rejected: u64,
}

impl PacketParser {
    pub fn new() -> Self {
        Self {
            packets_parsed: 0,
            packets_rejected: 0,
        }
    }

    pub fn packets_parsed(&self) -> u64 {
        self.packets_parsed
    }

    pub fn packets_rejected(&self) -> u64 {
        self.packets_rejected
    }

    /// Parses one client-to-server packet and replays it on `connector`
    pub fn parse_uplink(
        &mut self,
        packet: &[u8],
        connector: &mut dyn UplinkConnector,
    ) -> Result<(), ParseError> {
        match Self::try_parse_uplink(packet, connector) {
            Ok(()) => {
                self.packets_parsed += 1;
                Ok(())
            }
            Err(error) => {
                self.packets_rejected += 1;
                warn!("rejecting uplink packet: {}", error);
                Err(error)
            }
        }
    }

    /// Parses one server-to-client packet and replays it on `connector`
    pub fn parse_downlink(
        &mut self,
        packet: &[u8],
        connector: &mut dyn DownlinkConnector,
    ) -> Result<(), ParseError> {
        match Self::try_parse_downlink(packet, connector) {
            Ok(()) => {
                self.packets_parsed += 1;
                Ok(())
            }
            Err(error) => {
                self.packets_rejected += 1;
                warn!("rejecting downlink packet: {}", error);
                Err(error)
            }
        }
    }

    fn try_parse_uplink(
        packet: &[u8],
        connector: &mut dyn UplinkConnector,
    ) -> Result<(), ParseError> {
        let (packet_type, mut reader) = Self::split(packet)?;
        if packet_type.receiver() != HostType::Server {
            return Err(ParseError::WrongDirection { packet_type });
        }

        match packet_type {
            PacketType::ActionTriggered => {
                let code = u32::de(&mut reader)?;
                let state = ActionState::de(&mut reader)?;
                Self::expect_consumed(&reader)?;
                connector.action_triggered(code, state);
            }
            PacketType::AnalogActionTriggered => {
                let code = u32::de(&mut reader)?;
                let axes = Vec2::de(&mut reader)?;
                Self::expect_consumed(&reader)?;
                connector.analog_action_triggered(code, axes);
            }
            PacketType::AcknowledgeSnapshot => {
                let tick = Tick::de(&mut reader)?;
                Self::expect_consumed(&reader)?;
                connector.acknowledge_snapshot(tick);
            }
            _ => unreachable!("receiver() already restricted the type set"),
        }
        Ok(())
    }

    fn try_parse_downlink(
        packet: &[u8],
        connector: &mut dyn DownlinkConnector,
    ) -> Result<(), ParseError> {
        let (packet_type, mut reader) = Self::split(packet)?;
        if packet_type.receiver() != HostType::Client {
            return Err(ParseError::WrongDirection { packet_type });
        }

        match packet_type {
            PacketType::LoadLevel => {
                let path = String::de(&mut reader)?;
                Self::expect_consumed(&reader)?;
                connector.load_level(&path);
            }
            PacketType::ObjectStateChanged => {
                let (tick, id, update) = Self::read_state_update(&mut reader)?;
                connector.object_states_changed(tick, id, &update);
            }
            PacketType::SpawnObject => {
                let id = LevelObjectId::de(&mut reader)?;
                Self::expect_consumed(&reader)?;
                connector.spawn_object(id);
            }
            PacketType::DespawnObject => {
                let id = LevelObjectId::de(&mut reader)?;
                Self::expect_consumed(&reader)?;
                connector.despawn_object(id);
            }
            PacketType::DestroyObject => {
                let id = LevelObjectId::de(&mut reader)?;
                Self::expect_consumed(&reader)?;
                connector.destroy_object(id);
            }
            PacketType::Event => {
                let realtime = f64::de(&mut reader)?;
                let event = EventVariant::de(&mut reader)?;
                Self::expect_consumed(&reader)?;
                connector.post_event(realtime, &event);
            }
            PacketType::ConfirmSnapshot => {
                if reader.remaining() != CONFIRM_PAYLOAD_SIZE {
                    return Err(ParseError::PayloadSizeMismatch {
                        declared: reader.remaining(),
                        expected: CONFIRM_PAYLOAD_SIZE,
                    });
                }
                let tick = Tick::de(&mut reader)?;
                let realtime = f64::de(&mut reader)?;
                let discrete_change_count = u32::de(&mut reader)?;
                let reference = Tick::de(&mut reader)?;
                let reference_tick = (reference != TICK_NONE).then_some(reference);
                connector.confirm_snapshot(tick, realtime, discrete_change_count, reference_tick);
            }
            _ => unreachable!("receiver() already restricted the type set"),
        }
        Ok(())
    }

    /// Validates the `[type][size]` header and hands back a bounds-checked
    /// reader over exactly the declared payload.
    fn split(packet: &[u8]) -> Result<(PacketType, ByteReader<'_>), ParseError> {
        if packet.len() < HEADER_SIZE {
            return Err(ParseError::Truncated {
                length: packet.len(),
                header: HEADER_SIZE,
            });
        }

        let packet_type = PacketType::from_byte(packet[0])
            .ok_or(ParseError::UnknownPacketType { value: packet[0] })?;

        let declared = u16::from_le_bytes([packet[1], packet[2]]) as usize;
        let actual = packet.len() - HEADER_SIZE;
        if declared != actual {
            return Err(ParseError::LengthMismatch { declared, actual });
        }

        Ok((packet_type, ByteReader::new(&packet[HEADER_SIZE..])))
    }

    /// State payloads are validated against their mask-derived size before
    /// any field beyond the fixed header is read.
    fn read_state_update(
        reader: &mut ByteReader<'_>,
    ) -> Result<(Tick, LevelObjectId, StateUpdate), ParseError> {
        let declared = reader.remaining();

        let tick = Tick::de(reader)?;
        let id = LevelObjectId::de(reader)?;
        let flags = u32::de(reader)?;

        if flags & !STATE_ALL != 0 {
            return Err(ParseError::InvalidStateMask { flags });
        }
        let expected = object_state_change_payload_size(flags);
        if declared != expected {
            return Err(ParseError::PayloadSizeMismatch { declared, expected });
        }

        let mut update = StateUpdate {
            flags,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visibility: true,
            running: false,
        };

        if flags & STATE_POSITION != 0 {
            update.position = Vec3::de(reader)?;
        }
        if flags & STATE_ROTATION != 0 {
            update.rotation = Quat::de(reader)?;
        }
        if flags & STATE_SCALE != 0 {
            update.scale = Vec3::de(reader)?;
        }
        if flags & STATE_VISIBILITY != 0 {
            let snap_flags = u8::de(reader)?;
            update.visibility = snap_flags & SNAP_FLAG_VISIBILITY != 0;
            update.running = snap_flags & SNAP_FLAG_RUNNING != 0;
        }

        Ok((tick, id, update))
    }

    fn expect_consumed(reader: &ByteReader<'_>) -> Result<(), ParseError> {
        if reader.remaining() != 0 {
            return Err(ParseError::TrailingBytes {
                count: reader.remaining(),
            });
        }
        Ok(())
    }
}

impl Default for PacketParser {
    fn default() -> Self {
        Self::new()
    }
}
