//! The marker type model.
//!
//! A marker is a typed annotation attached to one map cell. The set of
//! marker kinds is closed: each kind has a stable numeric tag (persisted in
//! saves), a record type, and an arm in every `match` over [`Marker`].
//!
//! ## Key Types
//!
//! - [`MarkerType`]: the persisted tag
//! - [`MarkerRecord`]: encode/decode/describe contract shared by the plain records
//! - [`Marker`]: the handle every caller programs against
//! - [`MarkerRegistry`]: per-tag binary readers and text parsers
//!
//! ## Adding a Kind
//!
//! A new kind needs a new tag at the end of [`MarkerType`], a record type, a
//! [`Marker`] case, and a registry entry. The compiler points at every
//! `match` that needs the new arm.

mod corruption;
mod door_seal;
mod feature;
mod malign;
mod marker;
mod phoenix;
mod position;
mod registry;
mod scripted;
mod terrain;
mod tomb;
mod wiz_props;

pub use corruption::CorruptionMarker;
pub use door_seal::DoorSealMarker;
pub use feature::FeatureMarker;
pub use malign::MalignGatewayMarker;
pub use marker::Marker;
pub use phoenix::PhoenixMarker;
pub use position::PositionMarker;
pub use registry::{
    parse_marker, read_marker, registry, MarkerRegistry, ParseFn, ReadFn, RegistryEntry,
};
pub use scripted::{Binding, ScriptedMarker};
pub use terrain::TerrainChangeMarker;
pub use tomb::TombMarker;
pub use wiz_props::WizPropsMarker;

use serde::{Deserialize, Serialize};

use crate::codec::{MarkerReader, MarkerWriter};
use crate::core::Coord;
use crate::error::MarkerError;

/// Marker type tag.
///
/// Tags are persisted as `u16` and must never be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum MarkerType {
    /// Overrides the feature seen at a cell.
    Feature = 0,
    /// Behaviour supplied by a script table.
    Scripted = 1,
    /// Corruption countdown.
    Corruption = 2,
    /// Free-form debug key/value bag.
    WizProps = 3,
    /// Entombment linking two monsters.
    Tomb = 4,
    /// Malign gateway provenance.
    MalignGateway = 5,
    /// Phoenix rebirth timer.
    Phoenix = 6,
    /// Relocation pointer.
    Position = 7,
    /// Sealed door.
    DoorSeal = 8,
    /// Timed terrain mutation.
    TerrainChange = 9,
}

impl MarkerType {
    /// Number of marker types.
    pub const COUNT: usize = 10;

    /// All marker types, in tag order.
    pub const ALL: [MarkerType; Self::COUNT] = [
        MarkerType::Feature,
        MarkerType::Scripted,
        MarkerType::Corruption,
        MarkerType::WizProps,
        MarkerType::Tomb,
        MarkerType::MalignGateway,
        MarkerType::Phoenix,
        MarkerType::Position,
        MarkerType::DoorSeal,
        MarkerType::TerrainChange,
    ];

    /// The persisted tag.
    #[must_use]
    pub const fn tag(self) -> u16 {
        self as u16
    }

    /// Look up a type by its persisted tag.
    #[must_use]
    pub fn from_tag(tag: u16) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// The name used in the text form (`<name>:<body>`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MarkerType::Feature => "feat",
            MarkerType::Scripted => "lua",
            MarkerType::Corruption => "corruption",
            MarkerType::WizProps => "wiz",
            MarkerType::Tomb => "tomb",
            MarkerType::MalignGateway => "malign",
            MarkerType::Phoenix => "phoenix",
            MarkerType::Position => "position",
            MarkerType::DoorSeal => "door_seal",
            MarkerType::TerrainChange => "terrain_change",
        }
    }

    /// Look up a type by its text-form name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl std::fmt::Display for MarkerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Encode/decode/describe contract for plain marker records.
///
/// `write_fields` and `read_fields` cover only the record's own fields; the
/// tag and position prefix is handled by [`Marker::write`] and
/// [`read_marker`]. Field order in both methods must match exactly.
///
/// The scripted marker does not implement this trait: its encoding and
/// description need a script host.
pub trait MarkerRecord: Clone {
    /// The tag this record is persisted under.
    const TYPE: MarkerType;

    /// A blank record at `pos`, ready for `read_fields`.
    fn blank(pos: Coord) -> Self;

    /// The cell this marker is attached to.
    fn pos(&self) -> Coord;

    /// Move the marker to another cell.
    fn set_pos(&mut self, pos: Coord);

    /// Write the record's fields.
    fn write_fields(&self, w: &mut MarkerWriter<'_>) -> Result<(), MarkerError>;

    /// Overwrite the record's fields from a stream written by `write_fields`.
    fn read_fields(&mut self, r: &mut MarkerReader<'_>) -> Result<(), MarkerError>;

    /// Human-readable one-line description. Never empty.
    fn describe(&self) -> String;

    /// Named property lookup. `None` when the record has no such property.
    fn property(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Decode a record of type `T` whose prefix has already been consumed.
pub(crate) fn read_record<T: MarkerRecord>(
    r: &mut MarkerReader<'_>,
    pos: Coord,
) -> Result<T, MarkerError> {
    let mut record = T::blank(pos);
    record.read_fields(r)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_dense_and_ordered() {
        for (i, kind) in MarkerType::ALL.iter().enumerate() {
            assert_eq!(usize::from(kind.tag()), i);
            assert_eq!(MarkerType::from_tag(kind.tag()), Some(*kind));
        }
        assert_eq!(MarkerType::from_tag(MarkerType::COUNT as u16), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(MarkerType::from_name("feat"), Some(MarkerType::Feature));
        assert_eq!(MarkerType::from_name("lua"), Some(MarkerType::Scripted));
        assert_eq!(MarkerType::from_name("FEAT"), None);
        assert_eq!(format!("{}", MarkerType::DoorSeal), "door_seal");
    }
}
