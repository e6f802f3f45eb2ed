//! Malign gateway marker.

use serde::{Deserialize, Serialize};

use crate::codec::{MarkerReader, MarkerWriter};
use crate::core::{Behaviour, Coord, Deity};
use crate::error::MarkerError;

use super::{MarkerRecord, MarkerType};

/// Provenance of an open malign gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalignGatewayMarker {
    pub pos: Coord,
    pub duration: i32,
    /// Opened by the player.
    pub is_player: bool,
    /// Opened by a summoned monster.
    pub monster_summoned: bool,
    /// Display name of whoever opened the gateway.
    pub summoner: String,
    pub behaviour: Behaviour,
    pub deity: Deity,
    pub power: i32,
}

impl MalignGatewayMarker {
    /// Create a new gateway marker with hostile, godless defaults.
    #[must_use]
    pub fn new(pos: Coord, duration: i32) -> Self {
        Self {
            pos,
            duration,
            is_player: false,
            monster_summoned: false,
            summoner: String::new(),
            behaviour: Behaviour::Hostile,
            deity: Deity::NONE,
            power: 0,
        }
    }

    /// Record who opened the gateway (builder pattern).
    #[must_use]
    pub fn with_summoner(mut self, summoner: impl Into<String>, is_player: bool) -> Self {
        self.summoner = summoner.into();
        self.is_player = is_player;
        self
    }

    /// Mark the gateway as opened by a summoned monster (builder pattern).
    #[must_use]
    pub fn monster_summoned(mut self) -> Self {
        self.monster_summoned = true;
        self
    }

    /// Set behaviour and deity of the monsters it lets through (builder pattern).
    #[must_use]
    pub fn with_allegiance(mut self, behaviour: Behaviour, deity: Deity) -> Self {
        self.behaviour = behaviour;
        self.deity = deity;
        self
    }

    /// Set the gateway's power (builder pattern).
    #[must_use]
    pub fn with_power(mut self, power: i32) -> Self {
        self.power = power;
        self
    }
}

impl MarkerRecord for MalignGatewayMarker {
    const TYPE: MarkerType = MarkerType::MalignGateway;

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
        w.write_i32(self.duration)?;
        w.write_bool(self.is_player)?;
        w.write_bool(self.monster_summoned)?;
        w.write_str(&self.summoner)?;
        w.write_u8(self.behaviour.as_u8())?;
        w.write_u8(self.deity.raw())?;
        w.write_i32(self.power)
    }

    fn read_fields(&mut self, r: &mut MarkerReader<'_>) -> Result<(), MarkerError> {
        self.duration = r.read_i32()?;
        self.is_player = r.read_bool()?;
        self.monster_summoned = r.read_bool()?;
        self.summoner = r.read_string()?;
        self.behaviour = r.read_enum("behaviour", Behaviour::from_u8)?;
        self.deity = Deity::new(r.read_u8()?);
        self.power = r.read_i32()?;
        Ok(())
    }

    fn describe(&self) -> String {
        let who = if self.summoner.is_empty() {
            "unknown"
        } else {
            self.summoner.as_str()
        };
        format!("malign gateway ({}, {})", self.duration, who)
    }
}
