//! Monster disposition values recorded by timed markers.

use serde::{Deserialize, Serialize};

byte_enum! {
    /// Monster behaviour at the time a marker was placed.
    pub enum Behaviour {
        Sleep = 0 => "sleep",
        Wander = 1 => "wander",
        Seek = 2 => "seek",
        Flee = 3 => "flee",
        Cornered = 4 => "cornered",
        Withdraw = 5 => "withdraw",
        Hostile = 6 => "hostile",
        Friendly = 7 => "friendly",
        GoodNeutral = 8 => "good_neutral",
        StrictNeutral = 9 => "strict_neutral",
        Neutral = 10 => "neutral",
        Charmed = 11 => "charmed",
        Copy = 12 => "copy",
    }
}

byte_enum! {
    /// Monster attitude towards the player.
    pub enum Attitude {
        Hostile = 0 => "hostile",
        Neutral = 1 => "neutral",
        StrictNeutral = 2 => "strict_neutral",
        GoodNeutral = 3 => "good_neutral",
        Friendly = 4 => "friendly",
    }
}

/// A deity identifier.
///
/// The marker layer never interprets gods, it only carries them through
/// saves, so this stays an opaque byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Deity(pub u8);

impl Deity {
    /// No god.
    pub const NONE: Deity = Deity(0);

    /// Create a new deity ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Deity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deity({})", self.0)
    }
}
