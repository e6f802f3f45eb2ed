//! Tomb marker.

use serde::{Deserialize, Serialize};

use crate::codec::{MarkerReader, MarkerWriter};
use crate::core::Coord;
use crate::error::MarkerError;

use super::{MarkerRecord, MarkerType};

/// Marks a cell walled in by an entombment.
///
/// `source` and `target` are monster numbers: the caster and the entombed
/// monster. The marker layer does not interpret them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TombMarker {
    pub pos: Coord,
    pub duration: i32,
    pub source: i32,
    pub target: i32,
}

impl TombMarker {
    /// Create a new tomb marker.
    #[must_use]
    pub fn new(pos: Coord, duration: i32, source: i32, target: i32) -> Self {
        Self {
            pos,
            duration,
            source,
            target,
        }
    }
}

impl MarkerRecord for TombMarker {
    const TYPE: MarkerType = MarkerType::Tomb;

    fn blank(pos: Coord) -> Self {
        Self::new(pos, 0, 0, 0)
    }

    fn pos(&self) -> Coord {
        self.pos
    }

    fn set_pos(&mut self, pos: Coord) {
        self.pos = pos;
    }

    fn write_fields(&self, w: &mut MarkerWriter<'_>) -> Result<(), MarkerError> {
        w.write_i32(self.duration)?;
        w.write_i32(self.source)?;
        w.write_i32(self.target)
    }

    fn read_fields(&mut self, r: &mut MarkerReader<'_>) -> Result<(), MarkerError> {
        self.duration = r.read_i32()?;
        self.source = r.read_i32()?;
        self.target = r.read_i32()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("tomb ({}, {}, {})", self.duration, self.source, self.target)
    }
}
