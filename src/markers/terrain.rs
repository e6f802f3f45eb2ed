//! Temporary terrain change marker.

use serde::{Deserialize, Serialize};

use crate::codec::{FormatVersion, MarkerReader, MarkerWriter};
use crate::core::{Coord, Feature, TerrainChangeKind};
use crate::error::MarkerError;

use super::{MarkerRecord, MarkerType};

/// A timed terrain mutation: `old_feature` was replaced by `new_feature`
/// and comes back when the duration runs out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainChangeMarker {
    pub pos: Coord,
    pub old_feature: Feature,
    pub new_feature: Feature,
    pub duration: i32,
    pub change_kind: TerrainChangeKind,
    /// Monster number responsible for the change, 0 for none.
    pub monster: i32,
}

impl TerrainChangeMarker {
    /// Create a new generic terrain change.
    #[must_use]
    pub fn new(pos: Coord, old_feature: Feature, new_feature: Feature, duration: i32) -> Self {
        Self {
            pos,
            old_feature,
            new_feature,
            duration,
            change_kind: TerrainChangeKind::Generic,
            monster: 0,
        }
    }

    /// Set the change kind (builder pattern).
    #[must_use]
    pub fn with_kind(mut self, kind: TerrainChangeKind) -> Self {
        self.change_kind = kind;
        self
    }

    /// Set the responsible monster (builder pattern).
    #[must_use]
    pub fn with_monster(mut self, monster: i32) -> Self {
        self.monster = monster;
        self
    }
}

impl MarkerRecord for TerrainChangeMarker {
    const TYPE: MarkerType = MarkerType::TerrainChange;

    fn blank(pos: Coord) -> Self {
        Self::new(pos, Feature::Floor, Feature::Floor, 0)
    }

    fn pos(&self) -> Coord {
        self.pos
    }

    fn set_pos(&mut self, pos: Coord) {
        self.pos = pos;
    }

    fn write_fields(&self, w: &mut MarkerWriter<'_>) -> Result<(), MarkerError> {
        w.write_i32(self.duration)?;
        w.write_u8(self.old_feature.as_u8())?;
        w.write_u8(self.new_feature.as_u8())?;
        w.write_u8(self.change_kind.as_u8())?;
        w.write_i32(self.monster)
    }

    fn read_fields(&mut self, r: &mut MarkerReader<'_>) -> Result<(), MarkerError> {
        self.duration = r.read_i32()?;
        self.old_feature = r.read_enum("feature", Feature::from_u8)?;
        self.new_feature = r.read_enum("feature", Feature::from_u8)?;
        self.change_kind = r.read_enum("terrain change kind", TerrainChangeKind::from_u8)?;
        self.monster = if r.version().has(FormatVersion::V2) {
            r.read_i32()?
        } else {
            0
        };
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "terrain change marker ({} -> {}, {}, {})",
            self.old_feature, self.new_feature, self.change_kind, self.duration
        )
    }
}
