//! Queries over a level's markers.
//!
//! `expected` in the `find_*` functions is matched exactly against the
//! property value; an empty `expected` matches any marker that has the
//! property at all. A `max` of 0 means no limit.

use crate::core::Coord;
use crate::events::EventDispatcher;
use crate::markers::Marker;
use crate::script::ScriptHost;

use super::MarkerStore;

fn matches_prop(marker: &Marker, host: &dyn ScriptHost, prop: &str, expected: &str) -> bool {
    marker
        .property(prop, host)
        .is_some_and(|value| expected.is_empty() || value == expected)
}

/// Remove every marker at `pos` along with the event listeners they
/// registered.
pub fn remove_markers_and_listeners_at(
    store: &mut MarkerStore,
    events: &mut EventDispatcher,
    host: &dyn ScriptHost,
    pos: Coord,
) {
    events.remove_listeners_at(pos);
    store.remove_at(pos, host);
}

/// Check whether any marker forbids `operation`.
///
/// `operation` is the full property name, conventionally `veto_<what>`. A
/// marker vetoes the operation when that property is `"veto"`.
///
/// ```
/// use dungeon_markers::core::Coord;
/// use dungeon_markers::markers::WizPropsMarker;
/// use dungeon_markers::script::NoScripting;
/// use dungeon_markers::store::{marker_vetoes_operation, MarkerStore};
///
/// let mut store = MarkerStore::new();
/// store.add(WizPropsMarker::new(Coord::new(2, 2)).with("veto_shaft", "veto").into());
///
/// assert!(marker_vetoes_operation(&store, &NoScripting, "veto_shaft"));
/// assert!(!marker_vetoes_operation(&store, &NoScripting, "shaft"));
/// assert!(!marker_vetoes_operation(&store, &NoScripting, "veto_teleport"));
/// ```
pub fn marker_vetoes_operation(store: &MarkerStore, host: &dyn ScriptHost, operation: &str) -> bool {
    store
        .iter()
        .any(|m| m.property(operation, host).as_deref() == Some("veto"))
}

/// Position of the first marker whose `prop` matches `expected`.
pub fn find_marker_position_by_prop(
    store: &MarkerStore,
    host: &dyn ScriptHost,
    prop: &str,
    expected: &str,
) -> Option<Coord> {
    store
        .iter()
        .find(|m| matches_prop(m, host, prop, expected))
        .map(Marker::pos)
}

/// Positions of up to `max` markers whose `prop` matches `expected`.
///
/// A cell holding several matching markers is listed once per marker.
pub fn find_marker_positions_by_prop(
    store: &MarkerStore,
    host: &dyn ScriptHost,
    prop: &str,
    expected: &str,
    max: usize,
) -> Vec<Coord> {
    find_markers_by_prop(store, host, prop, expected, max)
        .into_iter()
        .map(Marker::pos)
        .collect()
}

/// Up to `max` markers whose `prop` matches `expected`.
pub fn find_markers_by_prop<'a>(
    store: &'a MarkerStore,
    host: &dyn ScriptHost,
    prop: &str,
    expected: &str,
    max: usize,
) -> Vec<&'a Marker> {
    let limit = if max == 0 { usize::MAX } else { max };
    store
        .iter()
        .filter(|m| matches_prop(m, host, prop, expected))
        .take(limit)
        .collect()
}
