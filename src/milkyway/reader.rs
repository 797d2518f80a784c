//! Low-level byte reading over a fixed in-memory payload.

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::UTF_8;

use super::error::{MilkywayError, Result};

/// Sequential reader over a byte slice.
///
/// Keeps an explicit cursor so every decode step advances through the
/// payload exactly once; there is no seeking or rewinding. All
/// multi-byte integers in the wire format are little-endian.
///
/// Any read that cannot be fully satisfied fails with
/// [`MilkywayError::UnexpectedEndOfData`] carrying the cursor position,
/// which makes truncated payloads easy to locate.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current cursor position in bytes from the start of the payload.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Read exactly `n` bytes and advance the cursor.
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(MilkywayError::UnexpectedEndOfData {
                offset: self.offset,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_exact(1)?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_exact(4)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_exact(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_exact(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_exact(4)?))
    }

    /// Read and discard one 32-bit version/tag field.
    ///
    /// Every block in the wire format starts with at least one of these.
    /// The server has never branched on their values, so they are consumed
    /// purely to keep the cursor aligned, never validated.
    pub fn skip_reserved_field(&mut self) -> Result<()> {
        self.read_exact(4)?;
        Ok(())
    }

    /// Read a 7-bit encoded length prefix.
    ///
    /// Each byte contributes its low 7 bits at an increasing shift
    /// (0, 7, 14, 21, 28); the high bit marks continuation. The
    /// accumulator is an unsigned 32-bit value, so bits shifted past
    /// position 31 are dropped rather than widened. A fifth continuation
    /// byte is malformed and fails with [`MilkywayError::VarIntTooLong`].
    pub fn read_varint32(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        let mut shift: u32 = 0;
        while shift != 35 {
            let byte = self.read_u8()?;
            value |= u32::from(byte & 0x7F).wrapping_shl(shift);
            shift += 7;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(MilkywayError::VarIntTooLong)
    }

    /// Read a varint32-length-prefixed UTF-8 string.
    ///
    /// Account names come from arbitrary platforms and occasionally carry
    /// broken encodings; invalid sequences are replaced with U+FFFD so a
    /// bad name never aborts the surrounding record list.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_varint32()? as usize;
        let bytes = self.read_exact(len)?;
        let (decoded, _, _) = UTF_8.decode(bytes);
        Ok(decoded.into_owned())
    }
}
