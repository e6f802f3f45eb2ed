//! Marker save/load integration tests.
//!
//! These tests write markers through `Marker::write` and read them back
//! through the registry, the same path a level save takes.

use dungeon_markers::codec::{FormatVersion, MarkerReader, MarkerWriter};
use dungeon_markers::core::{Attitude, Behaviour, Coord, Deity, Feature, TerrainChangeKind};
use dungeon_markers::error::MarkerError;
use dungeon_markers::markers::{
    read_marker, CorruptionMarker, DoorSealMarker, FeatureMarker, MalignGatewayMarker, Marker,
    MarkerRecord, MarkerType, PhoenixMarker, PositionMarker, ScriptedMarker, TerrainChangeMarker,
    TombMarker, WizPropsMarker,
};
use dungeon_markers::script::NoScripting;
use dungeon_markers::store::MarkerStore;
use proptest::prelude::*;

fn encode(marker: &Marker) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut writer = MarkerWriter::new(&mut buf);
    marker.write(&mut writer, &NoScripting).unwrap();
    buf
}

fn decode(bytes: &[u8], version: FormatVersion) -> Result<Marker, MarkerError> {
    let mut slice = bytes;
    let mut reader = MarkerReader::with_version(&mut slice, version);
    read_marker(&mut reader)
}

fn round_trip(marker: Marker) -> Marker {
    decode(&encode(&marker), FormatVersion::CURRENT).unwrap()
}

fn representative_markers() -> Vec<Marker> {
    let at = Coord::new(12, 7);
    vec![
        FeatureMarker::new(at, Feature::EscapeHatchDown).into(),
        ScriptedMarker::from_source(at, "return { n = 1 }", "vault").into(),
        CorruptionMarker::new(at, 140).into(),
        WizPropsMarker::new(at)
            .with("dst", "altar")
            .with("veto_dig", "veto")
            .into(),
        TombMarker::new(at, 60, 3, 4).into(),
        MalignGatewayMarker::new(at, 25)
            .with_summoner("the player", true)
            .with_allegiance(Behaviour::Friendly, Deity::new(7))
            .with_power(12)
            .into(),
        PhoenixMarker::new(at, 9, 42)
            .with_disposition(Behaviour::Sleep, Attitude::GoodNeutral, Deity::new(3))
            .with_corpse(Coord::new(13, 7))
            .into(),
        PositionMarker::new(at, Coord::new(40, 2)).into(),
        DoorSealMarker::new(at, 30, 5)
            .with_old_feature(Feature::RunedDoor)
            .into(),
        TerrainChangeMarker::new(at, Feature::Floor, Feature::DeepWater, 50)
            .with_kind(TerrainChangeKind::Flood)
            .with_monster(8)
            .into(),
    ]
}

/// Construct a feature marker, save it, load it, and get the same feature
/// at the same position back.
#[test]
fn test_feature_marker_round_trip() {
    let marker: Marker = FeatureMarker::new(Coord::new(31, 18), Feature::Altar).into();
    let loaded = round_trip(marker);

    let feature = loaded.as_feature().expect("should load as a feature marker");
    assert_eq!(feature.feature, Feature::Altar);
    assert_eq!(loaded.pos(), Coord::new(31, 18));
}

#[test]
fn test_every_kind_round_trips() {
    let markers = representative_markers();
    assert_eq!(markers.len(), MarkerType::COUNT);

    for marker in markers {
        let loaded = round_trip(marker.clone());
        assert_eq!(loaded, marker, "{:?} changed on reload", marker.get_type());
    }
}

/// The all-default record of `kind`. The match keeps new kinds from being
/// skipped.
fn blank_marker(kind: MarkerType, pos: Coord) -> Marker {
    match kind {
        MarkerType::Feature => FeatureMarker::blank(pos).into(),
        MarkerType::Scripted => ScriptedMarker::new(pos).into(),
        MarkerType::Corruption => CorruptionMarker::blank(pos).into(),
        MarkerType::WizProps => WizPropsMarker::blank(pos).into(),
        MarkerType::Tomb => TombMarker::blank(pos).into(),
        MarkerType::MalignGateway => MalignGatewayMarker::blank(pos).into(),
        MarkerType::Phoenix => PhoenixMarker::blank(pos).into(),
        MarkerType::Position => PositionMarker::blank(pos).into(),
        MarkerType::DoorSeal => DoorSealMarker::blank(pos).into(),
        MarkerType::TerrainChange => TerrainChangeMarker::blank(pos).into(),
    }
}

#[test]
fn test_blank_records_round_trip() {
    let at = Coord::new(1, 1);
    for kind in MarkerType::ALL {
        let marker = blank_marker(kind, at);
        assert_eq!(marker.get_type(), kind);
        assert_eq!(round_trip(marker.clone()), marker, "{kind}");
    }
    assert_eq!(
        blank_marker(MarkerType::Feature, at).as_feature().map(|m| m.feature),
        Some(Feature::Unseen)
    );
}

#[test]
fn test_prefix_is_tag_then_position() {
    let marker: Marker = CorruptionMarker::new(Coord::new(2, -3), 99).into();
    let bytes = encode(&marker);

    assert_eq!(&bytes[0..2], &MarkerType::Corruption.tag().to_le_bytes());
    assert_eq!(&bytes[2..6], &2i32.to_le_bytes());
    assert_eq!(&bytes[6..10], &(-3i32).to_le_bytes());
    assert_eq!(&bytes[10..14], &99i32.to_le_bytes());
    assert_eq!(bytes.len(), 14);
}

#[test]
fn test_unknown_tag_is_fatal() {
    let mut bytes = encode(&CorruptionMarker::new(Coord::ORIGIN, 1).into());
    bytes[0..2].copy_from_slice(&500u16.to_le_bytes());

    let err = decode(&bytes, FormatVersion::CURRENT).unwrap_err();
    assert!(matches!(err, MarkerError::UnknownTag { tag: 500 }));
}

#[test]
fn test_bad_feature_byte_is_corrupt() {
    let mut bytes = encode(&FeatureMarker::new(Coord::ORIGIN, Feature::Tree).into());
    let last = bytes.len() - 1;
    bytes[last] = 250;

    let err = decode(&bytes, FormatVersion::CURRENT).unwrap_err();
    assert!(matches!(err, MarkerError::Corrupt { .. }));
}

#[test]
fn test_truncated_stream_is_an_error() {
    let bytes = encode(&TombMarker::new(Coord::ORIGIN, 1, 2, 3).into());
    assert!(decode(&bytes[..bytes.len() - 2], FormatVersion::CURRENT).is_err());
}

#[test]
fn test_v1_phoenix_has_no_corpse_position() {
    let marker: Marker = PhoenixMarker::new(Coord::new(4, 4), 10, 77)
        .with_corpse(Coord::new(5, 5))
        .into();
    let bytes = encode(&marker);
    // A v1 record ends before the trailing corpse coordinate.
    let v1 = &bytes[..bytes.len() - 8];

    let loaded = decode(v1, FormatVersion::V1).unwrap();
    let phoenix = loaded.as_phoenix().unwrap();
    assert_eq!(phoenix.monster, 77);
    assert_eq!(phoenix.corpse_pos, Coord::INVALID);
}

#[test]
fn test_v1_terrain_change_has_no_monster() {
    let marker: Marker = TerrainChangeMarker::new(Coord::ORIGIN, Feature::Floor, Feature::Tree, 5)
        .with_kind(TerrainChangeKind::Forested)
        .with_monster(19)
        .into();
    let bytes = encode(&marker);
    let v1 = &bytes[..bytes.len() - 4];

    let loaded = decode(v1, FormatVersion::V1).unwrap();
    let change = loaded.as_terrain_change().unwrap();
    assert_eq!(change.change_kind, TerrainChangeKind::Forested);
    assert_eq!(change.monster, 0);
}

#[test]
fn test_store_round_trip_preserves_order() {
    let mut store = MarkerStore::new();
    for marker in representative_markers().into_iter().rev() {
        store.add(marker);
    }
    store.add(CorruptionMarker::new(Coord::new(0, 0), 3).into());

    let mut buf = Vec::new();
    store
        .write(&mut MarkerWriter::new(&mut buf), &NoScripting)
        .unwrap();

    let mut slice = buf.as_slice();
    let loaded = MarkerStore::read(&mut MarkerReader::new(&mut slice)).unwrap();

    assert_eq!(loaded.len(), store.len());
    let original: Vec<&Marker> = store.iter().collect();
    let reloaded: Vec<&Marker> = loaded.iter().collect();
    assert_eq!(original, reloaded);
    assert!(slice.is_empty(), "reader should consume the whole stream");
}

fn arb_coord() -> impl Strategy<Value = Coord> {
    (-1i32..200, -1i32..200).prop_map(|(x, y)| Coord::new(x, y))
}

fn arb_feature() -> impl Strategy<Value = Feature> {
    prop::sample::select(Feature::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_terrain_change_round_trips(
        pos in arb_coord(),
        old in arb_feature(),
        new in arb_feature(),
        duration in any::<i32>(),
        kind in prop::sample::select(TerrainChangeKind::ALL.to_vec()),
        monster in any::<i32>(),
    ) {
        let marker: Marker = TerrainChangeMarker::new(pos, old, new, duration)
            .with_kind(kind)
            .with_monster(monster)
            .into();
        prop_assert_eq!(round_trip(marker.clone()), marker);
    }

    #[test]
    fn prop_wiz_props_round_trip(
        pos in arb_coord(),
        props in prop::collection::btree_map("[a-z_]{1,8}", "[ -~]{0,12}", 0..6),
    ) {
        let mut marker = WizPropsMarker::new(pos);
        marker.properties = props;
        let marker: Marker = marker.into();
        prop_assert_eq!(round_trip(marker.clone()), marker);
    }

    #[test]
    fn prop_malign_gateway_round_trips(
        pos in arb_coord(),
        duration in any::<i32>(),
        summoner in "[ -~]{0,20}",
        is_player in any::<bool>(),
        behaviour in prop::sample::select(Behaviour::ALL.to_vec()),
        deity in any::<u8>(),
        power in any::<i32>(),
    ) {
        let marker: Marker = MalignGatewayMarker::new(pos, duration)
            .with_summoner(summoner, is_player)
            .with_allegiance(behaviour, Deity::new(deity))
            .with_power(power)
            .into();
        prop_assert_eq!(round_trip(marker.clone()), marker);
    }
}
