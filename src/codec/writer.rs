//! Write half of the marker cursor.

use std::io::Write;

use bincode::Options;
use serde::Serialize;

use crate::core::Coord;
use crate::error::MarkerError;

use super::options;

/// Typed writer over any byte sink.
pub struct MarkerWriter<'a> {
    inner: &'a mut dyn Write,
}

impl<'a> MarkerWriter<'a> {
    /// Wrap a byte sink.
    pub fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner }
    }

    fn put<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), MarkerError> {
        options().serialize_into(&mut *self.inner, value)?;
        Ok(())
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, v: u8) -> Result<(), MarkerError> {
        self.put(&v)
    }

    /// Write a little-endian `u16`.
    pub fn write_u16(&mut self, v: u16) -> Result<(), MarkerError> {
        self.put(&v)
    }

    /// Write a little-endian `i32`.
    pub fn write_i32(&mut self, v: i32) -> Result<(), MarkerError> {
        self.put(&v)
    }

    /// Write a boolean as one byte.
    pub fn write_bool(&mut self, v: bool) -> Result<(), MarkerError> {
        self.put(&v)
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, s: &str) -> Result<(), MarkerError> {
        self.put(s)
    }

    /// Write a coordinate as `x` then `y`.
    pub fn write_coord(&mut self, c: Coord) -> Result<(), MarkerError> {
        self.write_i32(c.x)?;
        self.write_i32(c.y)
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<(), MarkerError> {
        self.inner.flush()?;
        Ok(())
    }
}
