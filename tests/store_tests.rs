//! Marker store and query integration tests.

use dungeon_markers::core::{Coord, Feature};
use dungeon_markers::markers::{FeatureMarker, Marker, MarkerType, TombMarker, WizPropsMarker};
use dungeon_markers::script::NoScripting;
use dungeon_markers::store::{
    find_marker_position_by_prop, find_marker_positions_by_prop, find_markers_by_prop,
    marker_vetoes_operation, MarkerStore,
};

/// Set a property on a stored wizard-props marker and find it by value.
#[test]
fn test_find_by_property_after_set() {
    let mut store = MarkerStore::new();
    let pos = Coord::new(17, 23);
    store.add(WizPropsMarker::new(pos).into());

    let marker = store.find_mut(pos, Some(MarkerType::WizProps)).unwrap();
    let previous = marker.set_property(&NoScripting, "debug", "1").unwrap();
    assert_eq!(previous, None);

    assert_eq!(
        find_marker_position_by_prop(&store, &NoScripting, "debug", "1"),
        Some(pos)
    );
    assert_eq!(find_marker_position_by_prop(&store, &NoScripting, "debug", "0"), None);
}

#[test]
fn test_results_follow_store_order() {
    let mut store = MarkerStore::new();
    store.add(WizPropsMarker::new(Coord::new(9, 1)).with("gate", "a").into());
    store.add(WizPropsMarker::new(Coord::new(2, 5)).with("gate", "b").into());
    store.add(WizPropsMarker::new(Coord::new(2, 5)).with("gate", "c").into());

    let found: Vec<String> = find_markers_by_prop(&store, &NoScripting, "gate", "", 0)
        .into_iter()
        .filter_map(|m| m.property("gate", &NoScripting))
        .collect();
    assert_eq!(found, vec!["b", "c", "a"]);

    assert_eq!(
        find_marker_positions_by_prop(&store, &NoScripting, "gate", "", 0),
        vec![Coord::new(2, 5), Coord::new(2, 5), Coord::new(9, 1)]
    );
}

#[test]
fn test_derived_feature_property() {
    let mut store = MarkerStore::new();
    store.add(FeatureMarker::new(Coord::new(3, 3), Feature::Fountain).into());
    store.add(FeatureMarker::new(Coord::new(4, 4), Feature::Statue).into());

    assert_eq!(
        find_marker_position_by_prop(&store, &NoScripting, "feature", "granite_statue"),
        Some(Coord::new(4, 4))
    );
}

#[test]
fn test_vetoes() {
    let mut store = MarkerStore::new();
    assert!(!marker_vetoes_operation(&store, &NoScripting, "veto_dig"));

    store.add(TombMarker::new(Coord::new(1, 1), 10, 1, 2).into());
    store.add(
        WizPropsMarker::new(Coord::new(8, 8))
            .with("veto_dig", "veto")
            .into(),
    );
    assert!(marker_vetoes_operation(&store, &NoScripting, "veto_dig"));
    assert!(!marker_vetoes_operation(&store, &NoScripting, "veto_shatter"));
    // The operation is the whole property name; no prefix is added.
    assert!(!marker_vetoes_operation(&store, &NoScripting, "dig"));
}

#[test]
fn test_duplicate_and_clone_of_plain_markers_agree() {
    let marker: Marker = TombMarker::new(Coord::new(1, 1), 10, 1, 2).into();
    assert_eq!(marker.duplicate(&NoScripting), marker.clone());
}

#[test]
fn test_all_of_type() {
    let mut store = MarkerStore::new();
    store.add(TombMarker::new(Coord::new(1, 1), 10, 1, 2).into());
    store.add(FeatureMarker::new(Coord::new(0, 1), Feature::Lava).into());
    store.add(TombMarker::new(Coord::new(0, 0), 5, 3, 4).into());

    let tombs: Vec<Coord> = store.all_of_type(MarkerType::Tomb).map(Marker::pos).collect();
    assert_eq!(tombs, vec![Coord::new(0, 0), Coord::new(1, 1)]);
}
