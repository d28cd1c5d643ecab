use std::fs;
use std::sync::{Arc, Mutex};

use rust_eda_toolkit::ingestion::{load_folder, LoadOptions};
use rust_eda_toolkit::naming::{NamingConvention, PrefixPolicy};
use rust_eda_toolkit::observability::{EdaEvent, EdaObserver, FileContext, Severity};
use rust_eda_toolkit::EdaError;

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<EdaEvent>>,
    failures: Mutex<Vec<Severity>>,
    alerts: Mutex<Vec<Severity>>,
}

impl EdaObserver for RecordingObserver {
    fn on_event(&self, event: &EdaEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn on_failure(&self, _ctx: &FileContext, severity: Severity, _error: &EdaError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &FileContext, severity: Severity, _error: &EdaError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn loads_every_csv_under_derived_names() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let load = load_folder("tests/fixtures/orders", &opts);
    assert!(load.is_complete());
    let names: Vec<&str> = load.tables.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Customer_Orders", "Order_Items"]);
    assert_eq!(load.tables["Order_Items"].shape(), (3, 3));

    let loaded: Vec<String> = obs
        .events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            EdaEvent::TableLoaded { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(loaded, vec!["Customer_Orders", "Order_Items"]);

    let tables = load.into_tables().unwrap();
    assert_eq!(tables.len(), 2);
}

#[test]
fn ten_character_prefix_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("XXXXXXXXXXorders data.csv"), "id;v\n1;2\n").unwrap();

    let load = load_folder(dir.path(), &LoadOptions::default());
    assert_eq!(load.tables.keys().collect::<Vec<_>>(), vec!["orders_data"]);
}

#[test]
fn one_bad_file_is_reported_without_losing_the_rest() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let load = load_folder("tests/fixtures/broken", &opts);
    assert_eq!(load.tables.keys().collect::<Vec<_>>(), vec!["Good"]);
    assert_eq!(load.failures.len(), 1);
    assert!(load.failures[0].path.ends_with("Fecom Inc Ragged.csv"));
    assert_eq!(load.failures[0].severity, Severity::Error);

    // Malformed content is not critical, so no alert at the default threshold.
    assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());

    // All-or-nothing view.
    assert!(load.into_tables().is_none());
}

#[test]
fn missing_folder_is_a_critical_failure() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let load = load_folder("tests/fixtures/no_such_folder", &opts);
    assert!(load.tables.is_empty());
    assert_eq!(load.failures.len(), 1);
    assert_eq!(load.failures[0].severity, Severity::Critical);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![Severity::Critical]);
}

#[test]
fn extension_is_configurable() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Fecom Inc Sales.tsv"), "a\tb\n1\t2\n").unwrap();
    fs::write(dir.path().join("Fecom Inc Other.csv"), "a;b\n1;2\n").unwrap();

    let mut opts = LoadOptions {
        extension: ".tsv".to_string(),
        ..Default::default()
    };
    opts.csv.delimiter = b'\t';

    let load = load_folder(dir.path(), &opts);
    assert_eq!(load.tables.keys().collect::<Vec<_>>(), vec!["Sales"]);
    assert_eq!(load.tables["Sales"].column_count(), 2);
}

#[test]
fn short_names_follow_the_prefix_policy() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sales.csv"), "a\n1\n").unwrap();

    let obs = Arc::new(RecordingObserver::default());
    let preserve = LoadOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };
    let load = load_folder(dir.path(), &preserve);
    assert_eq!(load.tables.keys().collect::<Vec<_>>(), vec!["sales"]);
    assert!(obs
        .events
        .lock()
        .unwrap()
        .iter()
        .any(|e| matches!(e, EdaEvent::NameFallback { used, .. } if used == "sales")));

    let reject = LoadOptions {
        naming: NamingConvention {
            policy: PrefixPolicy::Reject,
            ..Default::default()
        },
        ..Default::default()
    };
    let load = load_folder(dir.path(), &reject);
    assert!(load.tables.is_empty());
    assert!(matches!(
        load.failures[0].error,
        EdaError::NamingConvention { .. }
    ));
}

#[test]
fn empty_file_is_a_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Fecom Inc Empty.csv"), "").unwrap();
    fs::write(dir.path().join("Fecom Inc Sales.csv"), "a;b\n1;2\n").unwrap();

    let load = load_folder(dir.path(), &LoadOptions::default());
    assert_eq!(load.tables.keys().collect::<Vec<_>>(), vec!["Sales"]);
    assert_eq!(load.failures.len(), 1);
    assert!(load.failures[0].path.ends_with("Fecom Inc Empty.csv"));
    assert!(matches!(load.failures[0].error, EdaError::SchemaMismatch { .. }));
    assert!(load.into_tables().is_none());
}
