//! Position reference marker.

use serde::{Deserialize, Serialize};

use crate::codec::{MarkerReader, MarkerWriter};
use crate::core::Coord;
use crate::error::MarkerError;

use super::{MarkerRecord, MarkerType};

/// Points from one cell to another, e.g. a portal and its exit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionMarker {
    pub pos: Coord,
    pub dest: Coord,
}

impl PositionMarker {
    /// Create a new position marker.
    #[must_use]
    pub fn new(pos: Coord, dest: Coord) -> Self {
        Self { pos, dest }
    }
}

impl MarkerRecord for PositionMarker {
    const TYPE: MarkerType = MarkerType::Position;

    fn blank(pos: Coord) -> Self {
        Self::new(pos, Coord::INVALID)
    }

    fn pos(&self) -> Coord {
        self.pos
    }

    fn set_pos(&mut self, pos: Coord) {
        self.pos = pos;
    }

    fn write_fields(&self, w: &mut MarkerWriter<'_>) -> Result<(), MarkerError> {
        w.write_coord(self.dest)
    }

    fn read_fields(&mut self, r: &mut MarkerReader<'_>) -> Result<(), MarkerError> {
        self.dest = r.read_coord()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("position {}", self.dest)
    }
}
