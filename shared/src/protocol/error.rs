use thiserror::Error;

use super::packet_type::PacketType;
use crate::serde::SerdeError;

/// Reasons the parser rejects a packet.
///
/// Every variant is logged and absorbed at the parser boundary; malformed
/// wire input never escalates past it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The buffer is shorter than the packet header
    #[error("packet of {length} byte(s) is shorter than the {header} byte header")]
    Truncated { length: usize, header: usize },

    /// The type byte does not name any known packet
    #[error("unknown packet type byte {value}")]
    UnknownPacketType { value: u8 },

    /// The declared payload size disagrees with the bytes actually present
    #[error("declared payload size {declared} but {actual} byte(s) present")]
    LengthMismatch { declared: usize, actual: usize },

    /// A packet arrived on the wrong direction's parser
    #[error("{packet_type:?} packet arrived for the wrong host")]
    WrongDirection { packet_type: PacketType },

    /// A state update's changed-field mask has bits outside the known set
    #[error("state mask {flags:#x} has unknown bits set")]
    InvalidStateMask { flags: u32 },

    /// The declared size does not match the size the payload must have
    /// (mask-derived for state updates, fixed for confirms)
    #[error("payload of {declared} byte(s) does not match the expected {expected}")]
    PayloadSizeMismatch { declared: usize, expected: usize },

    /// A payload held more bytes than its fields account for
    #[error("{count} trailing byte(s) after the last field")]
    TrailingBytes { count: usize },

    /// A field could not be decoded
    #[error("malformed field: {0}")]
    Malformed(#[from] SerdeError),
}
