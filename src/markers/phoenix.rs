//! Phoenix rebirth marker.

use serde::{Deserialize, Serialize};

use crate::codec::{FormatVersion, MarkerReader, MarkerWriter};
use crate::core::{Attitude, Behaviour, Coord, Deity};
use crate::error::MarkerError;

use super::{MarkerRecord, MarkerType};

/// Ties a rebirth timer to a specific monster and, optionally, its corpse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoenixMarker {
    pub pos: Coord,
    pub duration: i32,
    /// Monster number of the phoenix.
    pub monster: i32,
    pub behaviour: Behaviour,
    pub attitude: Attitude,
    pub deity: Deity,
    /// Where the corpse lies, or [`Coord::INVALID`].
    pub corpse_pos: Coord,
}

impl PhoenixMarker {
    /// Create a new phoenix marker for a hostile, godless monster.
    #[must_use]
    pub fn new(pos: Coord, duration: i32, monster: i32) -> Self {
        Self {
            pos,
            duration,
            monster,
            behaviour: Behaviour::Hostile,
            attitude: Attitude::Hostile,
            deity: Deity::NONE,
            corpse_pos: Coord::INVALID,
        }
    }

    /// Set the monster's disposition (builder pattern).
    #[must_use]
    pub fn with_disposition(mut self, behaviour: Behaviour, attitude: Attitude, deity: Deity) -> Self {
        self.behaviour = behaviour;
        self.attitude = attitude;
        self.deity = deity;
        self
    }

    /// Set the corpse position (builder pattern).
    #[must_use]
    pub fn with_corpse(mut self, corpse_pos: Coord) -> Self {
        self.corpse_pos = corpse_pos;
        self
    }
}

impl MarkerRecord for PhoenixMarker {
    const TYPE: MarkerType = MarkerType::Phoenix;

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
        w.write_u8(self.behaviour.as_u8())?;
        w.write_u8(self.attitude.as_u8())?;
        w.write_u8(self.deity.raw())?;
        w.write_coord(self.corpse_pos)
    }

    fn read_fields(&mut self, r: &mut MarkerReader<'_>) -> Result<(), MarkerError> {
        self.duration = r.read_i32()?;
        self.monster = r.read_i32()?;
        self.behaviour = r.read_enum("behaviour", Behaviour::from_u8)?;
        self.attitude = r.read_enum("attitude", Attitude::from_u8)?;
        self.deity = Deity::new(r.read_u8()?);
        self.corpse_pos = if r.version().has(FormatVersion::V2) {
            r.read_coord()?
        } else {
            Coord::INVALID
        };
        Ok(())
    }

    fn describe(&self) -> String {
        format!("phoenix marker ({}, {})", self.duration, self.monster)
    }
}
