use std::fs;
use std::sync::{Arc, Mutex};

use rust_eda_toolkit::ingestion::{load_folder, LoadOptions};
use rust_eda_toolkit::observability::{
    CompositeObserver, EdaEvent, EdaObserver, FileContext, FileObserver, Severity,
};
use rust_eda_toolkit::EdaError;

#[derive(Default)]
struct CountingObserver {
    events: Mutex<usize>,
    failures: Mutex<usize>,
}

impl EdaObserver for CountingObserver {
    fn on_event(&self, _event: &EdaEvent) {
        *self.events.lock().unwrap() += 1;
    }

    fn on_failure(&self, _ctx: &FileContext, _severity: Severity, _error: &EdaError) {
        *self.failures.lock().unwrap() += 1;
    }
}

#[test]
fn file_observer_appends_one_line_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("eda.log");
    let opts = LoadOptions {
        observer: Some(Arc::new(FileObserver::new(&log))),
        ..Default::default()
    };

    load_folder("tests/fixtures/broken", &opts);

    let text = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("loaded table=Good"));
    assert!(lines[1].contains("fail severity=Error"));
    assert!(lines[1].contains("Fecom Inc Ragged.csv"));
}

#[test]
fn alerts_are_logged_separately_at_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("eda.log");
    let opts = LoadOptions {
        observer: Some(Arc::new(FileObserver::new(&log))),
        alert_at_or_above: Severity::Error,
        ..Default::default()
    };

    load_folder("tests/fixtures/broken", &opts);

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.lines().any(|l| l.contains("ALERT severity=Error")));
}

#[test]
fn composite_fans_out_to_every_observer() {
    let a = Arc::new(CountingObserver::default());
    let b = Arc::new(CountingObserver::default());
    let observers: Vec<Arc<dyn EdaObserver>> = vec![a.clone(), b.clone()];
    let opts = LoadOptions {
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..Default::default()
    };

    load_folder("tests/fixtures/broken", &opts);

    for obs in [&a, &b] {
        assert_eq!(*obs.events.lock().unwrap(), 1);
        assert_eq!(*obs.failures.lock().unwrap(), 1);
    }
}
