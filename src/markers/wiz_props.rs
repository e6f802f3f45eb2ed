//! Wizard-mode property bag.
//!
//! A free-form `key → value` map that level designers and debug tooling
//! attach to cells. Keys are kept sorted so the encoding is deterministic.
//!
//! ## Text Form
//!
//! `wiz:<key>=<value>;<key>=<value>...`
//!
//! Segments are split on `;`, each at its first `=`. Keys and values are
//! trimmed. Empty segments are skipped; an empty key or a segment without
//! `=` is an error. Values may contain `=`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codec::{MarkerReader, MarkerWriter};
use crate::core::Coord;
use crate::error::{MarkerError, ParseErrorKind};

use super::{Marker, MarkerRecord, MarkerType};

/// Free-form debug properties.
///
/// ```
/// use dungeon_markers::core::Coord;
/// use dungeon_markers::markers::{MarkerRecord, WizPropsMarker};
///
/// let mut props = WizPropsMarker::new(Coord::new(1, 1));
/// assert_eq!(props.set_property("debug", "1"), None);
/// assert_eq!(props.set_property("debug", "2").as_deref(), Some("1"));
/// assert_eq!(props.property("debug").as_deref(), Some("2"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizPropsMarker {
    pub pos: Coord,
    pub properties: BTreeMap<String, String>,
}

impl WizPropsMarker {
    /// Create an empty property bag.
    #[must_use]
    pub fn new(pos: Coord) -> Self {
        Self {
            pos,
            properties: BTreeMap::new(),
        }
    }

    /// Add a property (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set a property, returning the previous value.
    pub fn set_property(&mut self, key: &str, value: &str) -> Option<String> {
        self.properties.insert(key.to_string(), value.to_string())
    }

    /// Parse the body of `wiz:...`.
    pub(crate) fn parse(body: &str, _context: &str) -> Result<Marker, ParseErrorKind> {
        let mut marker = Self::new(Coord::ORIGIN);
        for segment in body.split(';') {
            if segment.trim().is_empty() {
                continue;
            }
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ParseErrorKind::MalformedProperty(segment.trim().to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ParseErrorKind::MalformedProperty(segment.trim().to_string()));
            }
            marker.set_property(key, value.trim());
        }
        Ok(Marker::WizProps(marker))
    }
}

impl MarkerRecord for WizPropsMarker {
    const TYPE: MarkerType = MarkerType::WizProps;

    fn blank(pos: Coord) -> Self {
        Self::new(pos)
    }

    fn pos(&self) -> Coord {
        self.pos
    }

    fn set_pos(&mut self, pos: Coord) {
        self.pos = pos;
    }

    fn write_fields(&self, w: &mut MarkerWriter<'_>) -> Result<(), MarkerError> {
        let count = i32::try_from(self.properties.len())
            .map_err(|_| MarkerError::corrupt("too many wizard properties"))?;
        w.write_i32(count)?;
        for (key, value) in &self.properties {
            w.write_str(key)?;
            w.write_str(value)?;
        }
        Ok(())
    }

    fn read_fields(&mut self, r: &mut MarkerReader<'_>) -> Result<(), MarkerError> {
        let count = r.read_i32()?;
        if count < 0 {
            return Err(MarkerError::corrupt(format!(
                "negative wizard property count {count}"
            )));
        }
        self.properties.clear();
        for _ in 0..count {
            let key = r.read_string()?;
            let value = r.read_string()?;
            self.properties.insert(key, value);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        if self.properties.is_empty() {
            return "wizard props: (none)".to_string();
        }
        let pairs: Vec<String> = self
            .properties
            .iter()
            .map(|(k, v)| format!("{k}=\"{v}\""))
            .collect();
        format!("wizard props: {}", pairs.join(", "))
    }

    fn property(&self, name: &str) -> Option<String> {
        self.properties
            .get(name)
            .filter(|v| !v.is_empty())
            .cloned()
    }
}
