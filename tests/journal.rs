//! End-to-end tests against the file backend.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use tempfile::TempDir;

use pindrop::query::{PinQuery, SortBy};
use pindrop::storage::{KeyValueStore, LoadOutcome, DATA_KEY, SETTINGS_KEY};
use pindrop::{open_store, Config, FileStore, MapTheme, NewPin, PinPatch, PinStatus, PinStore, Settings, Theme};

fn config(dir: &TempDir) -> Config {
    Config { data_dir: dir.path().to_path_buf(), ..Config::default() }
}

#[test]
fn journal_survives_restart() {
    let dir = TempDir::new().unwrap();

    let mut store = open_store(&config(&dir)).unwrap();
    let kyoto = store
        .add(NewPin::new("Kyoto", 35.01, 135.77, "Japan").with_status(PinStatus::Visited).with_rating(5))
        .unwrap();
    let lima = store.add(NewPin::new("Lima", -12.05, -77.04, "Peru")).unwrap();
    store.update(&lima, PinPatch { notes: Some("ceviche".into()), ..PinPatch::default() }).unwrap();
    store.update_setting("mapTheme", &json!("topographic")).unwrap();
    drop(store);

    let store = open_store(&config(&dir)).unwrap();
    assert_eq!(store.pins().len(), 2);
    assert_eq!(store.get(&kyoto).unwrap().rating, Some(5));
    assert_eq!(store.get(&lima).unwrap().notes, "ceviche");
    assert_eq!(store.settings().map_theme, MapTheme::Topographic);

    let stats = store.stats();
    assert_eq!(stats.visited, 1);
    assert_eq!(stats.countries, 2);
    assert!((stats.average_rating - 5.0).abs() < f64::EPSILON);
}

#[test]
fn corrupt_files_are_repaired_on_open() {
    let dir = TempDir::new().unwrap();
    let mut backend = FileStore::new(dir.path()).unwrap();
    backend.set(DATA_KEY, "{ not json").unwrap();
    backend.set(SETTINGS_KEY, r#"{"theme":"neon","language":"fr","backupInterval":14}"#).unwrap();

    let (store, report) = PinStore::open(backend).unwrap();
    assert!(store.pins().is_empty());
    assert!(report.data.is_repaired());
    assert!(report.settings.is_repaired());

    let expected = Settings { language: "fr".into(), backup_interval: 14, ..Settings::default() };
    assert_eq!(store.settings(), &expected);

    // repaired settings were written back
    let rewritten: Settings = serde_json::from_str(&store.backend().get(SETTINGS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(rewritten, expected);
    assert_eq!(rewritten.theme, Theme::Light);
}

#[test]
fn readable_pins_are_kept_when_some_are_malformed() {
    let dir = TempDir::new().unwrap();
    let mut backend = FileStore::new(dir.path()).unwrap();
    let data = json!({
        "pins": [
            {
                "id": "1", "name": "Oslo", "lat": 59.91, "lng": 10.75, "country": "Norway",
                "status": "visited", "notes": "", "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            },
            { "id": ["2"], "name": "Broken" }
        ],
        "categories": ["nordic"]
    });
    backend.set(DATA_KEY, &data.to_string()).unwrap();

    let (store, report) = PinStore::open(backend).unwrap();
    assert!(matches!(report.data, LoadOutcome::Repaired { value: 1, .. }));
    assert_eq!(store.pins().len(), 1);
    assert_eq!(store.pins()[0].name, "Oslo");
    assert_eq!(store.categories(), ["nordic".to_string()]);
}

#[test]
fn backup_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&config(&dir)).unwrap();
    store.add(NewPin::new("Cusco", -13.53, -71.97, "Peru").with_status(PinStatus::Favorite)).unwrap();
    store.add(NewPin::new("Quito", -0.18, -78.47, "Ecuador")).unwrap();

    let backup = dir.path().join("backup.json");
    std::fs::write(&backup, store.export_snapshot().unwrap()).unwrap();
    let exported = store.data().clone();

    store.clear_all().unwrap();
    assert!(store.pins().is_empty());
    assert!(store.backend().get(DATA_KEY).unwrap().is_none());

    let text = std::fs::read_to_string(&backup).unwrap();
    assert!(store.import_snapshot(&text).unwrap());
    assert_eq!(store.data(), &exported);

    // an invalid backup leaves the collection alone
    assert!(!store.import_snapshot(r#"{"categories":[]}"#).unwrap());
    assert_eq!(store.data(), &exported);
}

#[test]
fn pin_list_query_over_stored_pins() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&config(&dir)).unwrap();
    store.add(NewPin::new("Sapporo", 43.06, 141.35, "Japan").with_status(PinStatus::Visited).with_rating(3)).unwrap();
    store.add(NewPin::new("Osaka", 34.69, 135.50, "Japan").with_status(PinStatus::Visited).with_rating(4)).unwrap();
    store.add(NewPin::new("Busan", 35.18, 129.08, "South Korea")).unwrap();

    let query = PinQuery {
        status: Some(PinStatus::Visited),
        search: "japan".into(),
        sort: SortBy::Rating,
    };
    let names: Vec<&str> = query.apply(store.pins()).iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Osaka", "Sapporo"]);
}
