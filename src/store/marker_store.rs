//! Per-level marker storage.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::codec::{MarkerReader, MarkerWriter};
use crate::core::Coord;
use crate::error::MarkerError;
use crate::events::EventDispatcher;
use crate::markers::{read_marker, Marker, MarkerType};
use crate::script::ScriptHost;

/// Markers on one cell. Most cells that have markers have exactly one.
type CellMarkers = SmallVec<[Marker; 1]>;

/// All markers on a level, keyed by cell.
///
/// Iteration order is ascending position, then insertion order within a
/// cell. Removal paths release script resources held by the removed markers
/// eagerly; markers dropped any other way, including with the store, release
/// them through their lease.
///
/// ```
/// use dungeon_markers::core::{Coord, Feature};
/// use dungeon_markers::markers::{FeatureMarker, MarkerType};
/// use dungeon_markers::store::MarkerStore;
///
/// let mut store = MarkerStore::new();
/// store.add(FeatureMarker::new(Coord::new(3, 4), Feature::Tree).into());
///
/// let found = store.find(Coord::new(3, 4), Some(MarkerType::Feature)).unwrap();
/// assert_eq!(found.as_feature().unwrap().feature, Feature::Tree);
/// assert!(store.find(Coord::new(4, 3), None).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MarkerStore {
    cells: BTreeMap<Coord, CellMarkers>,
    count: usize,
}

impl MarkerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Add a marker at its own position.
    pub fn add(&mut self, marker: Marker) {
        self.cells.entry(marker.pos()).or_default().push(marker);
        self.count += 1;
    }

    /// Markers at `pos`, in insertion order.
    #[must_use]
    pub fn markers_at(&self, pos: Coord) -> &[Marker] {
        self.cells.get(&pos).map(|c| c.as_slice()).unwrap_or_default()
    }

    /// First marker at `pos`, optionally restricted to `kind`.
    #[must_use]
    pub fn find(&self, pos: Coord, kind: Option<MarkerType>) -> Option<&Marker> {
        self.markers_at(pos)
            .iter()
            .find(|m| kind.map_or(true, |k| m.get_type() == k))
    }

    /// Mutable version of [`find`](Self::find).
    ///
    /// Changing the marker's position through the reference leaves it filed
    /// under the old cell; use [`move_markers`](Self::move_markers) instead.
    pub fn find_mut(&mut self, pos: Coord, kind: Option<MarkerType>) -> Option<&mut Marker> {
        self.cells
            .get_mut(&pos)?
            .iter_mut()
            .find(|m| kind.map_or(true, |k| m.get_type() == k))
    }

    /// Take every marker at `pos` out of the store without releasing them.
    pub fn take(&mut self, pos: Coord) -> Vec<Marker> {
        let taken: Vec<Marker> = self
            .cells
            .remove(&pos)
            .map(|cell| cell.into_vec())
            .unwrap_or_default();
        self.count -= taken.len();
        taken
    }

    /// Remove the first marker of `kind` at `pos`. Returns whether one was
    /// removed.
    pub fn remove(&mut self, pos: Coord, kind: MarkerType, host: &dyn ScriptHost) -> bool {
        let Some(cell) = self.cells.get_mut(&pos) else {
            return false;
        };
        let Some(index) = cell.iter().position(|m| m.get_type() == kind) else {
            return false;
        };
        let mut marker = cell.remove(index);
        if cell.is_empty() {
            self.cells.remove(&pos);
        }
        self.count -= 1;
        marker.release(host);
        true
    }

    /// Remove every marker at `pos`. Returns how many were removed.
    pub fn remove_at(&mut self, pos: Coord, host: &dyn ScriptHost) -> usize {
        let removed = self.take(pos);
        let n = removed.len();
        for mut marker in removed {
            marker.release(host);
        }
        n
    }

    /// Remove every marker of `kind`. Returns how many were removed.
    pub fn remove_type(&mut self, kind: MarkerType, host: &dyn ScriptHost) -> usize {
        let mut removed = 0;
        self.cells.retain(|_, cell| {
            cell.retain(|m| {
                if m.get_type() == kind {
                    m.release(host);
                    removed += 1;
                    false
                } else {
                    true
                }
            });
            !cell.is_empty()
        });
        self.count -= removed;
        removed
    }

    /// Remove every marker.
    pub fn clear(&mut self, host: &dyn ScriptHost) {
        for (_, cell) in std::mem::take(&mut self.cells) {
            for mut marker in cell {
                marker.release(host);
            }
        }
        self.count = 0;
    }

    /// Every marker of `kind`, in store order.
    pub fn all_of_type(&self, kind: MarkerType) -> impl Iterator<Item = &Marker> {
        self.iter().filter(move |m| m.get_type() == kind)
    }

    /// Every marker, in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.cells.values().flat_map(|cell| cell.iter())
    }

    /// Property `name` of the first marker at `pos` (of `kind`, if given)
    /// that has it.
    #[must_use]
    pub fn property_at(
        &self,
        pos: Coord,
        kind: Option<MarkerType>,
        name: &str,
        host: &dyn ScriptHost,
    ) -> Option<String> {
        self.markers_at(pos)
            .iter()
            .filter(|m| kind.map_or(true, |k| m.get_type() == k))
            .find_map(|m| m.property(name, host))
    }

    /// Move every marker at `from` to `to`, after any markers already there.
    /// Returns how many moved.
    pub fn move_markers(&mut self, from: Coord, to: Coord) -> usize {
        if from == to {
            return self.markers_at(from).len();
        }
        let moved = self.take(from);
        let n = moved.len();
        for mut marker in moved {
            marker.set_pos(to);
            self.add(marker);
        }
        n
    }

    /// Activate every marker, then register the event listeners their
    /// scripts asked for.
    pub fn activate_all(&self, host: &dyn ScriptHost, events: &mut EventDispatcher, verbose: bool) {
        for marker in self.iter() {
            marker.activate(host, verbose);
            for request in host.take_listener_requests() {
                events.register(marker.pos(), request);
            }
        }
    }

    /// Write the marker count followed by every marker in store order.
    pub fn write(&self, w: &mut MarkerWriter<'_>, host: &dyn ScriptHost) -> Result<(), MarkerError> {
        let count = i32::try_from(self.count)
            .map_err(|_| MarkerError::corrupt(format!("too many markers to save: {}", self.count)))?;
        w.write_i32(count)?;
        for marker in self.iter() {
            marker.write(w, host)?;
        }
        Ok(())
    }

    /// Read a store written by [`write`](Self::write).
    pub fn read(r: &mut MarkerReader<'_>) -> Result<Self, MarkerError> {
        let count = r.read_i32()?;
        if count < 0 {
            return Err(MarkerError::corrupt(format!("negative marker count {count}")));
        }
        let mut store = Self::new();
        for _ in 0..count {
            store.add(read_marker(r)?);
        }
        tracing::debug!(markers = store.len(), "marker store loaded");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Feature;
    use crate::markers::{CorruptionMarker, FeatureMarker, WizPropsMarker};
    use crate::script::NoScripting;

    fn sample() -> MarkerStore {
        let mut store = MarkerStore::new();
        store.add(FeatureMarker::new(Coord::new(5, 5), Feature::Lava).into());
        store.add(CorruptionMarker::new(Coord::new(1, 9), 30).into());
        store.add(WizPropsMarker::new(Coord::new(5, 5)).with("a", "1").into());
        store
    }

    #[test]
    fn test_iteration_order() {
        let store = sample();
        let order: Vec<(Coord, MarkerType)> = store.iter().map(|m| (m.pos(), m.get_type())).collect();
        assert_eq!(
            order,
            vec![
                (Coord::new(1, 9), MarkerType::Corruption),
                (Coord::new(5, 5), MarkerType::Feature),
                (Coord::new(5, 5), MarkerType::WizProps),
            ]
        );
    }

    #[test]
    fn test_find_by_kind() {
        let store = sample();
        let cell = Coord::new(5, 5);
        assert_eq!(store.find(cell, None).map(Marker::get_type), Some(MarkerType::Feature));
        assert_eq!(
            store.find(cell, Some(MarkerType::WizProps)).map(Marker::get_type),
            Some(MarkerType::WizProps)
        );
        assert!(store.find(cell, Some(MarkerType::Tomb)).is_none());
    }

    #[test]
    fn test_remove_paths_keep_count() {
        let mut store = sample();
        assert_eq!(store.len(), 3);

        assert!(store.remove(Coord::new(5, 5), MarkerType::Feature, &NoScripting));
        assert!(!store.remove(Coord::new(5, 5), MarkerType::Feature, &NoScripting));
        assert_eq!(store.len(), 2);

        assert_eq!(store.remove_type(MarkerType::Corruption, &NoScripting), 1);
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove_at(Coord::new(5, 5), &NoScripting), 1);
        assert!(store.is_empty());
        assert!(store.markers_at(Coord::new(5, 5)).is_empty());
    }

    #[test]
    fn test_move_markers() {
        let mut store = sample();
        let to = Coord::new(1, 9);
        assert_eq!(store.move_markers(Coord::new(5, 5), to), 2);
        assert_eq!(store.len(), 3);
        assert!(store.markers_at(to).iter().all(|m| m.pos() == to));
        assert_eq!(store.markers_at(to)[0].get_type(), MarkerType::Corruption);
    }

    #[test]
    fn test_property_at() {
        let store = sample();
        let cell = Coord::new(5, 5);
        assert_eq!(store.property_at(cell, None, "a", &NoScripting).as_deref(), Some("1"));
        assert_eq!(
            store.property_at(cell, None, "feature", &NoScripting).as_deref(),
            Some("lava")
        );
        assert_eq!(
            store.property_at(cell, Some(MarkerType::WizProps), "feature", &NoScripting),
            None
        );
    }

    #[test]
    fn test_clear() {
        let mut store = sample();
        store.clear(&NoScripting);
        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);
    }
}
