//! Read half of the marker cursor.

use std::io::Read;

use bincode::Options;
use serde::de::DeserializeOwned;

use crate::core::Coord;
use crate::error::MarkerError;

use super::{options, FormatVersion};

/// Typed reader over any byte source.
///
/// Carries the [`FormatVersion`] of the stream so records can tell which
/// trailing fields are present.
pub struct MarkerReader<'a> {
    inner: &'a mut dyn Read,
    version: FormatVersion,
}

impl<'a> MarkerReader<'a> {
    /// Wrap a byte source written by the current format version.
    pub fn new(inner: &'a mut dyn Read) -> Self {
        Self::with_version(inner, FormatVersion::CURRENT)
    }

    /// Wrap a byte source written by an older format version.
    pub fn with_version(inner: &'a mut dyn Read, version: FormatVersion) -> Self {
        Self { inner, version }
    }

    /// The format version of the stream.
    #[must_use]
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    fn take<T: DeserializeOwned>(&mut self) -> Result<T, MarkerError> {
        Ok(options().deserialize_from(&mut *self.inner)?)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, MarkerError> {
        self.take()
    }

    /// Read a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, MarkerError> {
        self.take()
    }

    /// Read a little-endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32, MarkerError> {
        self.take()
    }

    /// Read a one-byte boolean. Any byte other than 0 or 1 is an error.
    pub fn read_bool(&mut self) -> Result<bool, MarkerError> {
        self.take()
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, MarkerError> {
        self.take()
    }

    /// Read a coordinate written by [`MarkerWriter::write_coord`](super::MarkerWriter::write_coord).
    pub fn read_coord(&mut self) -> Result<Coord, MarkerError> {
        let x = self.read_i32()?;
        let y = self.read_i32()?;
        Ok(Coord::new(x, y))
    }

    /// Read a byte and decode it with `decode`, failing as corrupt data
    /// (naming `what`) when the byte is out of range.
    pub fn read_enum<T>(
        &mut self,
        what: &str,
        decode: impl FnOnce(u8) -> Option<T>,
    ) -> Result<T, MarkerError> {
        let raw = self.read_u8()?;
        decode(raw).ok_or_else(|| MarkerError::corrupt(format!("invalid {what} byte {raw}")))
    }
}
