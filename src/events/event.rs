//! Level event types.
//!
//! Events are fired by the simulation when something happens on the level.
//! Listeners subscribe with an [`EventMask`] and receive a [`DungeonEvent`].

use serde::{Deserialize, Serialize};

use crate::core::Coord;
use crate::script::ScriptValue;

byte_enum! {
    /// What happened.
    ///
    /// The name of each kind is also the suffix of the script handler that
    /// receives it (`on_turn_elapsed`, `on_player_moved`, ...).
    pub enum DungeonEventKind {
        TurnElapsed = 0 => "turn_elapsed",
        MonsterMoved = 1 => "monster_moved",
        PlayerMoved = 2 => "player_moved",
        LeavingLevel = 3 => "leaving_level",
        EnteringLevel = 4 => "entering_level",
        EnteredLevel = 5 => "entered_level",
        PlayerInLos = 6 => "player_in_los",
        PlayerClimbs = 7 => "player_climbs",
        MonsterDied = 8 => "monster_died",
        ItemPickup = 9 => "item_pickup",
        ItemMoved = 10 => "item_moved",
        FeatureChange = 11 => "feat_change",
        WallHit = 12 => "wall_hit",
    }
}

/// A set of event kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventMask(u32);

impl EventMask {
    /// No events.
    pub const EMPTY: EventMask = EventMask(0);

    /// A mask holding exactly `kind`.
    #[must_use]
    pub const fn of(kind: DungeonEventKind) -> Self {
        Self(1 << kind as u8)
    }

    /// Every event kind.
    #[must_use]
    pub fn all() -> Self {
        DungeonEventKind::ALL
            .iter()
            .fold(Self::EMPTY, |mask, &kind| mask.with(kind))
    }

    /// Add a kind (builder pattern).
    #[must_use]
    pub const fn with(self, kind: DungeonEventKind) -> Self {
        Self(self.0 | Self::of(kind).0)
    }

    /// Check whether `kind` is in the set.
    #[must_use]
    pub const fn contains(self, kind: DungeonEventKind) -> bool {
        self.0 & Self::of(kind).0 != 0
    }

    /// Check whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parse a list of kind names separated by spaces and/or commas.
    ///
    /// ```
    /// use dungeon_markers::events::{DungeonEventKind, EventMask};
    ///
    /// let mask = EventMask::parse("turn_elapsed, player_moved").unwrap();
    /// assert!(mask.contains(DungeonEventKind::PlayerMoved));
    /// assert!(!mask.contains(DungeonEventKind::WallHit));
    /// assert!(EventMask::parse("nonsense").is_err());
    /// ```
    pub fn parse(names: &str) -> Result<Self, String> {
        names
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|name| !name.is_empty())
            .try_fold(Self::EMPTY, |mask, name| {
                DungeonEventKind::from_name(name)
                    .map(|kind| mask.with(kind))
                    .ok_or_else(|| format!("unknown event kind '{name}'"))
            })
    }
}

impl std::ops::BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

impl From<DungeonEventKind> for EventMask {
    fn from(kind: DungeonEventKind) -> Self {
        Self::of(kind)
    }
}

/// An event that happened on the level.
///
/// `arg1`/`arg2` are kind-specific (monster number, item index, ...);
/// `dest` is the destination of movement events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonEvent {
    pub kind: DungeonEventKind,
    /// The cell the event happened at.
    pub place: Coord,
    pub elapsed_ticks: i32,
    pub arg1: i32,
    pub arg2: i32,
    pub dest: Coord,
}

impl DungeonEvent {
    /// Create an event at `place`.
    #[must_use]
    pub fn new(kind: DungeonEventKind, place: Coord) -> Self {
        Self {
            kind,
            place,
            elapsed_ticks: 0,
            arg1: 0,
            arg2: 0,
            dest: Coord::INVALID,
        }
    }

    /// Set elapsed ticks (builder pattern).
    #[must_use]
    pub fn with_elapsed(mut self, ticks: i32) -> Self {
        self.elapsed_ticks = ticks;
        self
    }

    /// Set the kind-specific arguments (builder pattern).
    #[must_use]
    pub fn with_args(mut self, arg1: i32, arg2: i32) -> Self {
        self.arg1 = arg1;
        self.arg2 = arg2;
        self
    }

    /// Set the destination cell (builder pattern).
    #[must_use]
    pub fn with_dest(mut self, dest: Coord) -> Self {
        self.dest = dest;
        self
    }

    /// Marshal the event into the table handed to script handlers.
    #[must_use]
    pub fn to_script_value(&self) -> ScriptValue {
        ScriptValue::Table(vec![
            ("kind".to_string(), ScriptValue::from(self.kind.name())),
            ("x".to_string(), ScriptValue::Int(self.place.x.into())),
            ("y".to_string(), ScriptValue::Int(self.place.y.into())),
            ("elapsed".to_string(), ScriptValue::Int(self.elapsed_ticks.into())),
            ("arg1".to_string(), ScriptValue::Int(self.arg1.into())),
            ("arg2".to_string(), ScriptValue::Int(self.arg2.into())),
            ("dest".to_string(), ScriptValue::Coord(self.dest)),
        ])
    }
}
