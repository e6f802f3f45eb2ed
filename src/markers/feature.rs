//! Feature override marker.

use serde::{Deserialize, Serialize};

use crate::codec::{MarkerReader, MarkerWriter};
use crate::core::{Coord, Feature};
use crate::error::{MarkerError, ParseErrorKind};

use super::{Marker, MarkerRecord, MarkerType};

/// Overrides the dungeon feature perceived at a cell.
///
/// ```
/// use dungeon_markers::core::{Coord, Feature};
/// use dungeon_markers::markers::{FeatureMarker, MarkerRecord};
///
/// let marker = FeatureMarker::new(Coord::new(10, 4), Feature::Tree);
/// assert_eq!(marker.describe(), "feature marker: tree");
/// assert_eq!(marker.property("feature").as_deref(), Some("tree"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMarker {
    /// The marked cell.
    pub pos: Coord,
    /// The feature to show at the cell.
    pub feature: Feature,
}

impl FeatureMarker {
    /// Create a new feature marker.
    #[must_use]
    pub fn new(pos: Coord, feature: Feature) -> Self {
        Self { pos, feature }
    }

    /// Parse the body of `feat:<feature-name>`.
    pub(crate) fn parse(body: &str, _context: &str) -> Result<Marker, ParseErrorKind> {
        let name = body.trim();
        let feature = Feature::from_name(name)
            .filter(|f| *f != Feature::Unseen)
            .ok_or_else(|| ParseErrorKind::UnknownFeature(name.to_string()))?;
        Ok(Marker::Feature(Self::new(Coord::ORIGIN, feature)))
    }
}

impl MarkerRecord for FeatureMarker {
    const TYPE: MarkerType = MarkerType::Feature;

    fn blank(pos: Coord) -> Self {
        Self::new(pos, Feature::Unseen)
    }

    fn pos(&self) -> Coord {
        self.pos
    }

    fn set_pos(&mut self, pos: Coord) {
        self.pos = pos;
    }

    fn write_fields(&self, w: &mut MarkerWriter<'_>) -> Result<(), MarkerError> {
        w.write_u8(self.feature.as_u8())
    }

    fn read_fields(&mut self, r: &mut MarkerReader<'_>) -> Result<(), MarkerError> {
        self.feature = r.read_enum("feature", Feature::from_u8)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("feature marker: {}", self.feature)
    }

    fn property(&self, name: &str) -> Option<String> {
        match (name, self.feature) {
            (_, Feature::Unseen) => None,
            ("feature", feat) => Some(feat.name().to_string()),
            _ => None,
        }
    }
}
