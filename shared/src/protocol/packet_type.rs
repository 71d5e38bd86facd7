// An enum representing the different types of packets that can be
// sent/received, one per connector call.

use crate::types::HostType;

/// Delivery classification of one packet type.
///
/// UNRELIABLE packets are superseded by a later packet of the same kind, so
/// loss is tolerable; RELIABLE packets must ride a channel with delivery
/// guarantees.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Reliability {
    Reliable,
    Unreliable,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PacketType {
    // client -> server
    ActionTriggered,
    AnalogActionTriggered,
    AcknowledgeSnapshot,
    // server -> client
    LoadLevel,
    ObjectStateChanged,
    SpawnObject,
    DespawnObject,
    DestroyObject,
    Event,
    ConfirmSnapshot,
}

impl PacketType {
    pub fn to_byte(self) -> u8 {
        match self {
            PacketType::ActionTriggered => 1,
            PacketType::AnalogActionTriggered => 2,
            PacketType::AcknowledgeSnapshot => 3,
            PacketType::LoadLevel => 4,
            PacketType::ObjectStateChanged => 5,
            PacketType::SpawnObject => 6,
            PacketType::DespawnObject => 7,
            PacketType::DestroyObject => 8,
            PacketType::Event => 9,
            PacketType::ConfirmSnapshot => 10,
        }
    }

    /// Malicious or malformed packets can carry any type byte; unknown
    /// values are rejected by the parser, never trusted.
    pub fn from_byte(value: u8) -> Option<PacketType> {
        match value {
            1 => Some(PacketType::ActionTriggered),
            2 => Some(PacketType::AnalogActionTriggered),
            3 => Some(PacketType::AcknowledgeSnapshot),
            4 => Some(PacketType::LoadLevel),
            5 => Some(PacketType::ObjectStateChanged),
            6 => Some(PacketType::SpawnObject),
            7 => Some(PacketType::DespawnObject),
            8 => Some(PacketType::DestroyObject),
            9 => Some(PacketType::Event),
            10 => Some(PacketType::ConfirmSnapshot),
            _ => None,
        }
    }

    /// Which host this packet type is addressed to
    pub fn receiver(self) -> HostType {
        match self {
            PacketType::ActionTriggered
            | PacketType::AnalogActionTriggered
            | PacketType::AcknowledgeSnapshot => HostType::Server,
            PacketType::LoadLevel
            | PacketType::ObjectStateChanged
            | PacketType::SpawnObject
            | PacketType::DespawnObject
            | PacketType::DestroyObject
            | PacketType::Event
            | PacketType::ConfirmSnapshot => HostType::Client,
        }
    }

    pub fn reliability(self) -> Reliability {
        match self {
            // A later snapshot/axis-state/ack supersedes an earlier one.
            PacketType::ObjectStateChanged
            | PacketType::AnalogActionTriggered
            | PacketType::AcknowledgeSnapshot => Reliability::Unreliable,
            PacketType::ActionTriggered
            | PacketType::LoadLevel
            | PacketType::SpawnObject
            | PacketType::DespawnObject
            | PacketType::DestroyObject
            | PacketType::Event
            | PacketType::ConfirmSnapshot => Reliability::Reliable,
        }
    }
}
