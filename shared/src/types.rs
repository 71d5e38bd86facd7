use crate::serde::{ByteReader, ByteWriter, Serde, SerdeError};

/// One discrete server simulation step. Monotonically increasing, never
/// reused within a session.
pub type Tick = u32;

/// Sentinel Tick written on the wire when a confirm carries no delta
/// reference.
pub const TICK_NONE: Tick = Tick::MAX;

// LevelObjectId
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct LevelObjectId(u64);

impl LevelObjectId {
    pub fn new(value: u64) -> Self {
        LevelObjectId(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl Serde for LevelObjectId {
    fn ser(&self, writer: &mut ByteWriter) {
        self.0.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        Ok(LevelObjectId(u64::de(reader)?))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

impl HostType {
    pub fn invert(self) -> Self {
        match self {
            HostType::Server => HostType::Client,
            HostType::Client => HostType::Server,
        }
    }
}
