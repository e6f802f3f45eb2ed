//! Door seal marker.

use serde::{Deserialize, Serialize};

use crate::codec::{MarkerReader, MarkerWriter};
use crate::core::{Coord, Feature};
use crate::error::MarkerError;

use super::{MarkerRecord, MarkerType};

/// A magically sealed door. Remembers the feature to restore when the
/// seal expires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSealMarker {
    pub pos: Coord,
    pub duration: i32,
    /// Monster number of the sealer.
    pub monster: i32,
    pub old_feature: Feature,
}

impl DoorSealMarker {
    /// Create a new door seal over a closed door.
    #[must_use]
    pub fn new(pos: Coord, duration: i32, monster: i32) -> Self {
        Self {
            pos,
            duration,
            monster,
            old_feature: Feature::ClosedDoor,
        }
    }

    /// Set the feature that was there before the seal (builder pattern).
    #[must_use]
    pub fn with_old_feature(mut self, feature: Feature) -> Self {
        self.old_feature = feature;
        self
    }
}

impl MarkerRecord for DoorSealMarker {
    const TYPE: MarkerType = MarkerType::DoorSeal;

    fn blank(pos: Coord) -> Self {
        Self::new(pos, 0, 0)
    }

    fn pos(&self) -> Coord {
        self.pos
    }

    fn set_pos(&mut self, pos: Coord) {
        self.pos = pos;
    }

    fn write_fields(&self, w: &mut MarkerWriter<'_>) -> Result<(), MarkerError> {
        w.write_i32(self.duration)?;
        w.write_i32(self.monster)?;
        w.write_u8(self.old_feature.as_u8())
    }

    fn read_fields(&mut self, r: &mut MarkerReader<'_>) -> Result<(), MarkerError> {
        self.duration = r.read_i32()?;
        self.monster = r.read_i32()?;
        self.old_feature = r.read_enum("feature", Feature::from_u8)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("door seal marker ({}, {})", self.duration, self.monster)
    }
}
