use super::error::SerdeError;

/// A bounds-checked cursor over one packet payload.
///
/// Every read validates against the remaining length before touching the
/// buffer; malformed input surfaces as [`SerdeError`], never as a panic or an
/// out-of-bounds read.
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn read_u8(&mut self) -> Result<u8, SerdeError> {
        let slice = self.read_slice(1)?;
        Ok(slice[0])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeError> {
        let slice = self.read_slice(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(slice);
        Ok(array)
    }

    pub fn read_slice(&mut self, length: usize) -> Result<&'a [u8], SerdeError> {
        if length > self.remaining() {
            return Err(SerdeError::BufferExhausted {
                needed: length - self.remaining(),
                remaining: self.remaining(),
            });
        }
        let slice = &self.buffer[self.cursor..self.cursor + length];
        self.cursor += length;
        Ok(slice)
    }
}
