//! Corruption countdown marker.

use serde::{Deserialize, Serialize};

use crate::codec::{MarkerReader, MarkerWriter};
use crate::core::Coord;
use crate::error::MarkerError;

use super::{MarkerRecord, MarkerType};

/// A corruption timer centred on a cell. Has no text form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorruptionMarker {
    pub pos: Coord,
    /// Remaining duration, in game ticks.
    pub duration: i32,
}

impl CorruptionMarker {
    /// Create a new corruption marker.
    #[must_use]
    pub fn new(pos: Coord, duration: i32) -> Self {
        Self { pos, duration }
    }
}

impl MarkerRecord for CorruptionMarker {
    const TYPE: MarkerType = MarkerType::Corruption;

    fn blank(pos: Coord) -> Self {
        Self::new(pos, 0)
    }

    fn pos(&self) -> Coord {
        self.pos
    }

    fn set_pos(&mut self, pos: Coord) {
        self.pos = pos;
    }

    fn write_fields(&self, w: &mut MarkerWriter<'_>) -> Result<(), MarkerError> {
        w.write_i32(self.duration)
    }

    fn read_fields(&mut self, r: &mut MarkerReader<'_>) -> Result<(), MarkerError> {
        self.duration = r.read_i32()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("corruption timer ({})", self.duration)
    }
}
