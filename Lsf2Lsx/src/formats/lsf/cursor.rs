//! Bounds-checked little-endian reader over an in-memory section
//!
//! Wraps a `Cursor` with `byteorder` reads and turns end-of-data into
//! [`Error::TruncatedInput`] tagged with the table being decoded.

use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// A cursor over one decompressed section.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    cursor: Cursor<&'a [u8]>,
    context: &'static str,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `data`; `context` names the section in errors.
    pub fn new(data: &'a [u8], context: &'static str) -> Self {
        Self {
            cursor: Cursor::new(data),
            context,
        }
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Total size of the underlying data, independent of the position.
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    /// True when the underlying data has no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn remaining(&self) -> usize {
        self.len()
            .saturating_sub(usize::try_from(self.position()).unwrap_or(usize::MAX))
    }

    /// Move to an absolute offset.
    ///
    /// Offsets past the end are rejected up front, since every caller seeks
    /// to a location it then reads from.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.len() {
            return Err(Error::DanglingReference(format!(
                "{} offset {offset} is past the end ({} bytes)",
                self.context,
                self.len()
            )));
        }
        self.cursor.set_position(offset as u64);
        Ok(())
    }

    /// Fail with `TruncatedInput` unless `needed` more bytes are available.
    pub fn require(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    fn truncated(&self, needed: usize) -> Error {
        Error::truncated(self.context, needed, self.position(), self.len())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.require(1)?;
        Ok(self.cursor.read_i8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.require(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.require(2)?;
        Ok(self.cursor.read_i16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.require(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.require(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.require(8)?;
        Ok(self.cursor.read_u64::<LittleEndian>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.require(8)?;
        Ok(self.cursor.read_i64::<LittleEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.require(4)?;
        Ok(self.cursor.read_f32::<LittleEndian>()?)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.require(8)?;
        Ok(self.cursor.read_f64::<LittleEndian>()?)
    }

    /// Read exactly `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.require(count)?;
        let mut buffer = vec![0u8; count];
        self.cursor.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.require(N)?;
        let mut buffer = [0u8; N];
        self.cursor.read_exact(&mut buffer)?;
        Ok(buffer)
    }
}
