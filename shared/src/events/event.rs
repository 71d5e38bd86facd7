use crate::serde::{ByteReader, ByteWriter, Serde, SerdeError};
use crate::types::LevelObjectId;

/// A key/button edge (press or release)
#[derive(Clone, Debug, PartialEq)]
pub struct ActionEvent {
    pub code: u32,
    pub down: bool,
}

/// Starts playback of an animation on one object's channel
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectAnimEvent {
    pub object_id: LevelObjectId,
    /// Asset reference of the animation to play. Resolution happens at
    /// dispatch time and may fail.
    pub anim_ref: String,
    pub channel: u8,
    pub speed: f32,
}

/// A script-level message passed from one object to another
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectMessageEvent {
    pub sender_id: LevelObjectId,
    pub receiver_id: LevelObjectId,
    pub message: String,
}

/// The closed set of discrete occurrences that replicate between hosts.
///
/// Adding a kind here is a compile error at every trait-impl site that names
/// known kinds, while visitor call sites stay valid through their default
/// arms.
#[derive(Clone, Debug, PartialEq)]
pub enum EventVariant {
    Action(ActionEvent),
    ObjectAnim(ObjectAnimEvent),
    ObjectMessage(ObjectMessageEvent),
}

// Wire tags
const EVENT_ACTION: u8 = 0;
const EVENT_OBJECT_ANIM: u8 = 1;
const EVENT_OBJECT_MESSAGE: u8 = 2;

impl Serde for EventVariant {
    fn ser(&self, writer: &mut ByteWriter) {
        match self {
            EventVariant::Action(event) => {
                writer.write_u8(EVENT_ACTION);
                event.code.ser(writer);
                event.down.ser(writer);
            }
            EventVariant::ObjectAnim(event) => {
                writer.write_u8(EVENT_OBJECT_ANIM);
                event.object_id.ser(writer);
                event.anim_ref.ser(writer);
                event.channel.ser(writer);
                event.speed.ser(writer);
            }
            EventVariant::ObjectMessage(event) => {
                writer.write_u8(EVENT_OBJECT_MESSAGE);
                event.sender_id.ser(writer);
                event.receiver_id.ser(writer);
                event.message.ser(writer);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        match reader.read_u8()? {
            EVENT_ACTION => Ok(EventVariant::Action(ActionEvent {
                code: u32::de(reader)?,
                down: bool::de(reader)?,
            })),
            EVENT_OBJECT_ANIM => Ok(EventVariant::ObjectAnim(ObjectAnimEvent {
                object_id: LevelObjectId::de(reader)?,
                anim_ref: String::de(reader)?,
                channel: u8::de(reader)?,
                speed: f32::de(reader)?,
            })),
            EVENT_OBJECT_MESSAGE => Ok(EventVariant::ObjectMessage(ObjectMessageEvent {
                sender_id: LevelObjectId::de(reader)?,
                receiver_id: LevelObjectId::de(reader)?,
                message: String::de(reader)?,
            })),
            tag => Err(SerdeError::UnknownVariant { tag }),
        }
    }
}

/// An event paired with the realtime second it belongs to
#[derive(Clone, Debug, PartialEq)]
pub struct TimedEvent {
    pub realtime: f64,
    pub event: EventVariant,
}
