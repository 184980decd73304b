//! Integration tests: observations through a store on disk and back.

use std::collections::{BTreeMap, BTreeSet};

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use hydrostore_meta::{DATASTORE_KEY, MetaField, MetaValue};
use hydrostore_obs::{CollectionMeta, DataTable, ObsCollection, ObsKind, Observation};
use hydrostore_pystore::{
    StoreError, StoreRoot, WriteOptions, read_collection, read_item, read_store, write_collection,
    write_item,
};

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 6, d)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn table(n: usize) -> DataTable {
    DataTable::new(
        (1..=n as u32).map(day).collect(),
        vec![(
            "stand_m_tov_nap".into(),
            (0..n).map(|i| -1.0 - i as f64 * 0.01).collect(),
        )],
    )
    .expect("fixture table is valid")
}

fn groundwater(name: &str, locatie: &str, n: usize) -> Observation {
    let mut meta = BTreeMap::new();
    meta.insert("locatie".to_string(), MetaField::from(locatie));
    meta.insert("filternr".to_string(), MetaField::from(1i64));
    meta.insert("maaiveld".to_string(), MetaField::from(2.35));
    meta.insert("screens".to_string(), MetaField::List(vec![]));
    Observation::new(name, table(n))
        .with_xy(Some(115534.0), Some(455123.0))
        .with_filename(format!("{name}.csv"))
        .with_meta(meta)
}

#[test]
fn item_round_trip_keeps_rows_and_metadata() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("test_pystore").unwrap();

    let obs = groundwater("B33F0133-1", "B33F0133", 5);
    let extraction = obs.extract_metadata();
    let item = write_item(
        &store,
        "B33F0133",
        obs.name(),
        obs.data(),
        &extraction.meta,
        &WriteOptions::default(),
    )
    .expect("write succeeds");

    let back = read_item(&item, ObsKind::Groundwater).expect("read succeeds");
    assert_eq!(back.name(), "B33F0133-1");
    assert_eq!(back.data().len(), 5);
    assert_eq!(back.data().column_names(), vec!["stand_m_tov_nap"]);
    assert_eq!(back.data().index(), obs.data().index());
    let values = back.data().column("stand_m_tov_nap").unwrap();
    assert_relative_eq!(values[4], -1.04);

    assert_eq!(back.x(), Some(115534.0));
    assert_eq!(back.y(), Some(455123.0));
    assert_eq!(back.filename(), "B33F0133-1.csv");
    for (key, value) in &extraction.meta {
        assert_eq!(back.meta_value(key), Some(value), "key {key}");
    }
    assert!(back.meta_value("screens").is_none());
    assert_eq!(
        back.meta_value(DATASTORE_KEY),
        Some(&MetaValue::Text(store.datastore()))
    );
}

#[test]
fn empty_table_round_trips_with_column_name() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();

    let empty = DataTable::empty(["value"]).unwrap();
    let item = write_item(
        &store,
        "c",
        "empty",
        &empty,
        &Default::default(),
        &WriteOptions::default(),
    )
    .expect("write succeeds");

    let back = read_item(&item, ObsKind::Groundwater).expect("read succeeds");
    assert!(back.data().is_empty());
    assert_eq!(back.data().column_names(), vec!["value"]);
}

#[test]
fn missing_coordinates_read_as_unknown() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();

    let obs = Observation::new("no_xy", table(2));
    let item = write_item(
        &store,
        "c",
        obs.name(),
        obs.data(),
        &obs.extract_metadata().meta,
        &WriteOptions::default(),
    )
    .unwrap();

    let back = read_item(&item, ObsKind::Groundwater).expect("read succeeds");
    assert!(back.x().is_none());
    assert!(back.y().is_none());
}

#[test]
fn second_write_without_overwrite_fails() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();
    let options = WriteOptions::default();

    write_item(&store, "c", "X", &table(3), &Default::default(), &options).unwrap();
    let err = write_item(&store, "c", "X", &table(4), &Default::default(), &options).unwrap_err();
    assert!(
        matches!(err, StoreError::AlreadyExists { .. }),
        "expected AlreadyExists, got {err:?}"
    );

    let item = store.collection("c").unwrap().item("X").unwrap();
    assert_eq!(read_item(&item, ObsKind::Groundwater).unwrap().data().len(), 3);
}

#[test]
fn overwrite_replaces_data_and_metadata() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();
    let options = WriteOptions::default().with_overwrite(true);

    let mut first = hydrostore_meta::FlatMeta::new();
    first.insert("only_in_first".into(), MetaValue::Bool(true));
    write_item(&store, "c", "X", &table(3), &first, &options).unwrap();

    let mut second = hydrostore_meta::FlatMeta::new();
    second.insert("only_in_second".into(), MetaValue::Int(2));
    let item = write_item(&store, "c", "X", &table(6), &second, &options).unwrap();

    let back = read_item(&item, ObsKind::Groundwater).unwrap();
    assert_eq!(back.data().len(), 6);
    assert!(back.meta_value("only_in_first").is_none());
    assert_eq!(back.meta_value("only_in_second"), Some(&MetaValue::Int(2)));
}

fn out_of_range_table() -> DataTable {
    let far = NaiveDate::from_ymd_opt(3000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    DataTable::new(vec![far], vec![("stand_m_tov_nap".into(), vec![1.0])]).unwrap()
}

fn dir_entries(path: &std::path::Path) -> BTreeSet<String> {
    std::fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn overwrite_leaves_no_staging_directories() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();
    let options = WriteOptions::default().with_overwrite(true);

    write_item(&store, "c", "X", &table(3), &Default::default(), &options).unwrap();
    write_item(&store, "c", "X", &table(4), &Default::default(), &options).unwrap();

    let collection = store.collection("c").unwrap();
    assert_eq!(dir_entries(collection.path()), BTreeSet::from(["X".to_string()]));
}

#[test]
fn failed_write_leaves_no_item() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();
    let options = WriteOptions::default();

    write_item(&store, "c", "good", &table(2), &Default::default(), &options).unwrap();
    let err = write_item(&store, "c", "bad", &out_of_range_table(), &Default::default(), &options)
        .unwrap_err();
    assert!(
        matches!(err, StoreError::InvalidTime { .. }),
        "expected InvalidTime, got {err:?}"
    );

    let collection = store.collection("c").unwrap();
    assert_eq!(dir_entries(collection.path()), BTreeSet::from(["good".to_string()]));
    let report = read_store(&store, None, ObsKind::Groundwater).unwrap();
    assert_eq!(report.observations.len(), 1);
    assert_eq!(report.observations[0].name(), "good");

    write_item(&store, "c", "bad", &table(1), &Default::default(), &options)
        .expect("retry with a valid table succeeds");
}

#[test]
fn failed_overwrite_keeps_previous_item() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();
    let options = WriteOptions::default().with_overwrite(true);

    let mut meta = hydrostore_meta::FlatMeta::new();
    meta.insert("locatie".into(), MetaValue::Text("kept".into()));
    write_item(&store, "c", "X", &table(3), &meta, &options).unwrap();

    let err = write_item(&store, "c", "X", &out_of_range_table(), &Default::default(), &options)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidTime { .. }));

    let item = store.collection("c").unwrap().item("X").unwrap();
    let back = read_item(&item, ObsKind::Groundwater).unwrap();
    assert_eq!(back.data().len(), 3);
    assert_eq!(back.meta_value("locatie"), Some(&MetaValue::Text("kept".into())));
    assert_eq!(read_store(&store, None, ObsKind::Groundwater).unwrap().observations.len(), 1);
}

#[test]
fn stored_kind_survives_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();

    let obs = Observation::new("rain", table(2)).with_kind(ObsKind::Precipitation);
    let meta = obs.extract_metadata().meta;
    assert_eq!(meta["kind"], MetaValue::Text("precipitation".into()));
    let item = write_item(&store, "c", "rain", obs.data(), &meta, &WriteOptions::default()).unwrap();

    let back = read_item(&item, ObsKind::Groundwater).unwrap();
    assert_eq!(back.kind(), ObsKind::Precipitation);
}

#[test]
fn filtered_collection_read_ignores_absent_names() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();
    write_item(
        &store,
        "coll",
        "A",
        &table(2),
        &Default::default(),
        &WriteOptions::default(),
    )
    .unwrap();

    let wanted: BTreeSet<String> = ["A".to_string(), "Z".to_string()].into();
    let report = read_collection(&store, "coll", Some(&wanted), ObsKind::Groundwater)
        .expect("filtered read succeeds");

    assert_eq!(report.observations.len(), 1);
    assert_eq!(report.observations[0].name(), "A");
    assert_eq!(report.missing, ["Z".to_string()].into());
}

#[test]
fn reading_unknown_collection_or_store_fails() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = StoreRoot::new(dir.path());

    let missing_store = root.store("nope").unwrap();
    let err = read_store(&missing_store, None, ObsKind::Groundwater).unwrap_err();
    assert!(matches!(err, StoreError::StoreNotFound { .. }));

    let store = root.store("s").unwrap();
    write_item(
        &store,
        "coll",
        "A",
        &table(1),
        &Default::default(),
        &WriteOptions::default(),
    )
    .unwrap();
    let err = read_collection(&store, "other", None, ObsKind::Groundwater).unwrap_err();
    assert!(matches!(err, StoreError::CollectionNotFound { .. }));
}

#[test]
fn grouped_collection_write_then_store_read() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("test_pystore").unwrap();

    let oc = ObsCollection::new(
        "oc",
        vec![
            groundwater("B33F0133-1", "B33F0133", 3),
            groundwater("B33F0133-2", "B33F0133", 4),
            groundwater("MPN-N-2", "MPN-N", 2),
        ],
        CollectionMeta::default(),
    );
    let options = WriteOptions::default().with_group_by("locatie");
    assert_eq!(write_collection(&store, &oc, &options).unwrap(), 3);

    assert_eq!(store.collections().unwrap(), vec!["B33F0133", "MPN-N"]);
    assert_eq!(
        store.collection("B33F0133").unwrap().items().unwrap(),
        vec!["B33F0133-1", "B33F0133-2"]
    );

    let report = read_store(&store, None, ObsKind::Groundwater).unwrap();
    let names: Vec<_> = report.observations.iter().map(Observation::name).collect();
    assert_eq!(names, vec!["B33F0133-1", "B33F0133-2", "MPN-N-2"]);
    assert!(report.missing.is_empty());

    let wanted: BTreeSet<String> = ["MPN-N-2".to_string(), "ghost".to_string()].into();
    let report = read_store(&store, Some(&wanted), ObsKind::Groundwater).unwrap();
    assert_eq!(report.observations.len(), 1);
    assert_eq!(report.observations[0].data().len(), 2);
    assert_eq!(report.missing, ["ghost".to_string()].into());
}

#[test]
fn rewriting_a_collection_requires_overwrite() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();
    let oc = ObsCollection::new(
        "oc",
        vec![groundwater("a", "L", 2)],
        CollectionMeta::default(),
    );

    write_collection(&store, &oc, &WriteOptions::default()).unwrap();
    assert!(matches!(
        write_collection(&store, &oc, &WriteOptions::default()),
        Err(StoreError::AlreadyExists { .. })
    ));
    assert_eq!(
        write_collection(&store, &oc, &WriteOptions::default().with_overwrite(true)).unwrap(),
        1
    );
}

#[test]
fn invalid_group_value_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StoreRoot::new(dir.path()).store("s").unwrap();
    let oc = ObsCollection::new(
        "oc",
        vec![groundwater("a", "../escape", 1)],
        CollectionMeta::default(),
    );
    let err = write_collection(&store, &oc, &WriteOptions::default().with_group_by("locatie"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidName { .. }));
}
