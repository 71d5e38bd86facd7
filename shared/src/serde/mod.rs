//! Byte-oriented little-endian wire encoding.
//!
//! Every connector argument that crosses a packet boundary implements
//! [`Serde`]; the packet builder/parser never touch raw byte offsets
//! themselves.

mod error;
mod reader;
mod writer;

pub use error::SerdeError;
pub use reader::ByteReader;
pub use writer::ByteWriter;

use glam::{Quat, Vec2, Vec3};

/// A type that can be written to / read from a packet payload
pub trait Serde: Sized {
    fn ser(&self, writer: &mut ByteWriter);
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError>;
}

impl Serde for bool {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u8(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        Ok(reader.read_u8()? != 0)
    }
}

impl Serde for u8 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u8(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        reader.read_u8()
    }
}

impl Serde for u16 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.to_le_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        Ok(u16::from_le_bytes(reader.read_array()?))
    }
}

impl Serde for u32 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.to_le_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        Ok(u32::from_le_bytes(reader.read_array()?))
    }
}

impl Serde for u64 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.to_le_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        Ok(u64::from_le_bytes(reader.read_array()?))
    }
}

impl Serde for f32 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.to_le_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        Ok(f32::from_le_bytes(reader.read_array()?))
    }
}

impl Serde for f64 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.to_le_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        Ok(f64::from_le_bytes(reader.read_array()?))
    }
}

// Strings ride as a u16 length prefix + UTF-8 bytes. Payloads are bounded by
// MAX_PAYLOAD_SIZE well below the u16 ceiling.
impl Serde for String {
    fn ser(&self, writer: &mut ByteWriter) {
        let bytes = self.as_bytes();
        writer.write_u16(bytes.len() as u16);
        writer.write_bytes(bytes);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        let length = u16::de(reader)? as usize;
        let bytes = reader.read_slice(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeError::InvalidUtf8)
    }
}

impl Serde for Vec2 {
    fn ser(&self, writer: &mut ByteWriter) {
        self.x.ser(writer);
        self.y.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        Ok(Vec2::new(f32::de(reader)?, f32::de(reader)?))
    }
}

impl Serde for Vec3 {
    fn ser(&self, writer: &mut ByteWriter) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.z.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        Ok(Vec3::new(
            f32::de(reader)?,
            f32::de(reader)?,
            f32::de(reader)?,
        ))
    }
}

impl Serde for Quat {
    fn ser(&self, writer: &mut ByteWriter) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.z.ser(writer);
        self.w.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeError> {
        Ok(Quat::from_xyzw(
            f32::de(reader)?,
            f32::de(reader)?,
            f32::de(reader)?,
            f32::de(reader)?,
        ))
    }
}
