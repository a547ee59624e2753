//! Loading scenario files from disk.

mod fixtures;

use std::fs;

use drt_replay::loader::{LoadError, ScenarioFiles, load_options};
use drt_replay::{AttemptsDoneMode, Replay, ReplayOptions};
use tempfile::tempdir;

#[test]
fn test_load_scenario_pair() {
    let dir = tempdir().expect("create temp dir");
    fs::write(dir.path().join("trip_wirye.json"), fixtures::trips().to_string()).expect("write trips");
    fs::write(dir.path().join("pax_icon_wirye.json"), fixtures::passengers().to_string()).expect("write pax");

    let files = ScenarioFiles::for_label(dir.path(), "wirye");
    let dataset = files.load(&ReplayOptions::default()).expect("scenario loads");

    assert_eq!(dataset.requests.len(), 6);
    assert_eq!(dataset.trips.len(), 3);

    let replay = Replay::new(dataset, ReplayOptions::default());
    assert_eq!(replay.metrics(25800.0).onboard_count, 3);
}

#[test]
fn test_missing_passenger_file() {
    let dir = tempdir().expect("create temp dir");
    fs::write(dir.path().join("trip_only.json"), "[]").expect("write trips");

    let err = ScenarioFiles::for_label(dir.path(), "only")
        .load(&ReplayOptions::default())
        .unwrap_err();
    match err {
        LoadError::Io { path, .. } => assert!(path.ends_with("pax_icon_only.json")),
        other => panic!("expected io error, got {:?}", other),
    }
}

#[test]
fn test_malformed_json_is_reported() {
    let dir = tempdir().expect("create temp dir");
    fs::write(dir.path().join("trip_bad.json"), "[{\"vehicle_id\": ").expect("write trips");
    fs::write(dir.path().join("pax_icon_bad.json"), "[]").expect("write pax");

    let err = ScenarioFiles::for_label(dir.path(), "bad")
        .load(&ReplayOptions::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::Json { .. }));
}

#[test]
fn test_wrong_shape_loads_as_empty() {
    let dir = tempdir().expect("create temp dir");
    fs::write(dir.path().join("trip_odd.json"), "{\"status\": \"ok\", \"count\": 3}").expect("write trips");
    fs::write(dir.path().join("pax_icon_odd.json"), "\"nothing here\"").expect("write pax");

    let dataset = ScenarioFiles::for_label(dir.path(), "odd")
        .load(&ReplayOptions::default())
        .expect("shape problems are not load errors");
    assert!(dataset.requests.is_empty());
    assert!(dataset.trips.is_empty());

    let metrics = Replay::new(dataset, ReplayOptions::default()).metrics(100.0);
    assert_eq!(metrics.vehicle_count, 0);
    assert!(metrics.per_vehicle_load.is_empty());
}

#[test]
fn test_load_options_file() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("replay.json");
    fs::write(&path, r#"{ "fade_window_seconds": 5.0, "attempts_done": "observed" }"#).expect("write options");

    let options = load_options(&path).expect("options load");
    assert_eq!(options.fade_window_seconds, 5.0);
    assert_eq!(options.attempts_done, AttemptsDoneMode::Observed);
    assert_eq!(options.vehicle_capacity, 5);
}
