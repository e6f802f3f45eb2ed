//! Typed binary cursor for marker save data.
//!
//! Markers are written field by field: there is no self-describing layout,
//! so field order is the schema. The cursor only offers the handful of
//! primitives markers need.
//!
//! ## Encoding
//!
//! All primitives go through `bincode` with fixed-width little-endian
//! integers. Strings are a `u64` byte length followed by UTF-8 bytes.
//! A `Coord` is two `i32`.
//!
//! ## Versioning
//!
//! The save format around the markers is versioned. A [`MarkerReader`] is
//! told which [`FormatVersion`] produced the stream so that records can skip
//! fields that were appended after that version. Writers always produce
//! [`FormatVersion::CURRENT`].
//!
//! ```
//! use dungeon_markers::codec::{MarkerReader, MarkerWriter};
//! use dungeon_markers::core::Coord;
//!
//! let mut buf = Vec::new();
//! let mut writer = MarkerWriter::new(&mut buf);
//! writer.write_coord(Coord::new(3, 4)).unwrap();
//! writer.write_str("door").unwrap();
//!
//! let mut bytes = buf.as_slice();
//! let mut reader = MarkerReader::new(&mut bytes);
//! assert_eq!(reader.read_coord().unwrap(), Coord::new(3, 4));
//! assert_eq!(reader.read_string().unwrap(), "door");
//! ```

mod reader;
mod writer;

pub use reader::MarkerReader;
pub use writer::MarkerWriter;

use serde::{Deserialize, Serialize};

/// Largest single field (in practice: string) accepted from a stream.
pub const MAX_FIELD_BYTES: u64 = 16 * 1024 * 1024;

/// Version of the save format a marker stream was written with.
///
/// History:
/// - v1: phoenix markers had no corpse position; terrain-change markers had
///   no monster number
/// - v2: both fields appended at the end of their records
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormatVersion(pub u8);

impl FormatVersion {
    /// The oldest version this build can read.
    pub const V1: FormatVersion = FormatVersion(1);

    /// Phoenix corpse position and terrain-change monster number.
    pub const V2: FormatVersion = FormatVersion(2);

    /// The version every writer produces.
    pub const CURRENT: FormatVersion = Self::V2;

    /// Whether a stream of this version carries fields introduced in `other`.
    #[must_use]
    pub fn has(self, other: FormatVersion) -> bool {
        self >= other
    }
}

impl Default for FormatVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

fn options() -> impl bincode::Options {
    use bincode::Options;

    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_FIELD_BYTES)
}
