//! Map cell coordinates.
//!
//! Markers are attached to cells, so every marker carries a `Coord`.
//! `Coord::INVALID` is the conventional "nowhere" value used by
//! position markers without a destination and by phoenix markers
//! whose corpse cell is unknown.

use serde::{Deserialize, Serialize};

/// A cell coordinate on the level map.
///
/// Ordering is by `x`, then `y`. The marker store relies on this to
/// iterate markers in a stable order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coord {
    /// The origin cell `(0, 0)`.
    pub const ORIGIN: Coord = Coord::new(0, 0);

    /// A coordinate that never names a real cell.
    pub const INVALID: Coord = Coord::new(-1, -1);

    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check whether this is anything other than [`Coord::INVALID`].
    ///
    /// ```
    /// use dungeon_markers::core::Coord;
    ///
    /// assert!(Coord::new(3, 4).is_valid());
    /// assert!(Coord::new(-2, 5).is_valid());
    /// assert!(!Coord::INVALID.is_valid());
    /// ```
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.x != Self::INVALID.x || self.y != Self::INVALID.y
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
