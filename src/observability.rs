//! Observer hooks for reporting what each operation did.
//!
//! Operations never print directly. Instead they emit [`EdaEvent`]s (and, for the bulk loader,
//! per-file failures) to an optional [`EdaObserver`] configured on their options struct:
//!
//! - [`ConsoleObserver`]: human-readable report lines on stdout (confirmations, null counts,
//!   duplicate listings, the generated schema)
//! - [`StdErrObserver`]: one bracketed log line per event on stderr
//! - [`FileObserver`]: appends timestamped lines to a local log file
//! - [`CompositeObserver`]: fans out to several observers

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::EdaError;
use crate::types::DataSet;

/// Severity classification used for failure callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Classify an error for observer callbacks.
///
/// I/O problems are [`Severity::Critical`]; malformed content is [`Severity::Error`].
pub fn severity_for_error(e: &EdaError) -> Severity {
    match e {
        EdaError::Io(_) | EdaError::Glob(_) => Severity::Critical,
        EdaError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        EdaError::Json(_)
        | EdaError::Pattern(_)
        | EdaError::SchemaMismatch { .. }
        | EdaError::ParseError { .. }
        | EdaError::UnknownColumn { .. }
        | EdaError::NamingConvention { .. }
        | EdaError::NoFileName(_) => Severity::Error,
    }
}

/// Context about a failed file-level operation.
#[derive(Debug, Clone)]
pub struct FileContext {
    /// The file (or folder) being processed.
    pub path: PathBuf,
}

/// Something an operation did that a caller may want to see.
#[derive(Debug, Clone, PartialEq)]
pub enum EdaEvent {
    /// The bulk loader parsed a file into a table.
    TableLoaded {
        name: String,
        path: PathBuf,
        rows: usize,
        columns: usize,
    },
    /// A file name did not follow the naming convention; `used` is the name chosen instead.
    NameFallback { path: PathBuf, used: String },
    /// A profiling report was written.
    ReportSaved { path: PathBuf },
    /// A profiling report was handed to the document viewer.
    ReportOpened { path: PathBuf },
    /// Per-column missing value counts, in the requested column order.
    NullCounts { counts: Vec<(String, usize)> },
    /// Outcome of the null co-occurrence check.
    NullOverlap {
        all_equal: bool,
        mismatch_count: usize,
        preview: Option<DataSet>,
    },
    /// Duplicate rows were found; `rows` holds every member of every duplicate group.
    DuplicatesFound { count: usize, rows: DataSet },
    /// Duplicates were dropped, keeping the first occurrence.
    DuplicatesRemoved { removed: usize, remaining: usize },
    /// No duplicates on the requested key.
    NoDuplicates,
    /// An Avro schema document was generated.
    SchemaGenerated { name: String, json: String },
    /// An Avro schema document was written.
    SchemaSaved { path: PathBuf },
}

/// Single-line description, used by the log-style observers.
impl fmt::Display for EdaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdaEvent::TableLoaded {
                name,
                path,
                rows,
                columns,
            } => write!(
                f,
                "loaded table={name} path={} rows={rows} columns={columns}",
                path.display()
            ),
            EdaEvent::NameFallback { path, used } => {
                write!(f, "naming fallback path={} used={used}", path.display())
            }
            EdaEvent::ReportSaved { path } => write!(f, "report saved path={}", path.display()),
            EdaEvent::ReportOpened { path } => write!(f, "report opened path={}", path.display()),
            EdaEvent::NullCounts { counts } => {
                write!(f, "null counts")?;
                for (col, n) in counts {
                    write!(f, " {col}={n}")?;
                }
                Ok(())
            }
            EdaEvent::NullOverlap {
                all_equal,
                mismatch_count,
                ..
            } => write!(f, "null overlap all_equal={all_equal} mismatches={mismatch_count}"),
            EdaEvent::DuplicatesFound { count, rows } => {
                write!(f, "duplicates found count={count} group_rows={}", rows.row_count())
            }
            EdaEvent::DuplicatesRemoved { removed, remaining } => {
                write!(f, "duplicates removed removed={removed} remaining={remaining}")
            }
            EdaEvent::NoDuplicates => write!(f, "no duplicates"),
            EdaEvent::SchemaGenerated { name, json } => {
                write!(f, "schema generated name={name} bytes={}", json.len())
            }
            EdaEvent::SchemaSaved { path } => write!(f, "schema saved path={}", path.display()),
        }
    }
}

/// Observer interface for operation outcomes.
///
/// Implementors can print reports, record logs, or trigger alerts.
pub trait EdaObserver: Send + Sync {
    /// Called for every reportable event.
    fn on_event(&self, _event: &EdaEvent) {}

    /// Called when a file-level operation fails.
    fn on_failure(&self, _ctx: &FileContext, _severity: Severity, _error: &EdaError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &FileContext, severity: Severity, error: &EdaError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Send `event` to `observer` if one is configured.
pub(crate) fn emit(observer: &Option<Arc<dyn EdaObserver>>, event: EdaEvent) {
    if let Some(obs) = observer {
        obs.on_event(&event);
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn EdaObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn EdaObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl EdaObserver for CompositeObserver {
    fn on_event(&self, event: &EdaEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }

    fn on_failure(&self, ctx: &FileContext, severity: Severity, error: &EdaError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &FileContext, severity: Severity, error: &EdaError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Prints human-readable reports to stdout.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    /// Render the lines printed for `event`.
    pub fn render(event: &EdaEvent) -> String {
        match event {
            EdaEvent::TableLoaded { name, .. } => format!("File {name} loaded!"),
            EdaEvent::NameFallback { path, used } => format!(
                "File {} does not follow the naming convention; using '{used}'",
                path.display()
            ),
            EdaEvent::ReportSaved { path } => format!("Report saved to {}", path.display()),
            EdaEvent::ReportOpened { path } => format!("Report opened: {}", path.display()),
            EdaEvent::NullCounts { counts } => {
                let mut out = String::from("Null Count per Column:");
                for (col, n) in counts {
                    out.push_str(&format!("\n - {col}: {n} nulls"));
                }
                out
            }
            EdaEvent::NullOverlap {
                all_equal: true, ..
            } => "Checking if nulls occur in the same rows:\n[V] All columns have nulls in the same rows."
                .to_string(),
            EdaEvent::NullOverlap {
                all_equal: false,
                mismatch_count,
                preview,
            } => {
                let mut out = format!(
                    "Checking if nulls occur in the same rows:\n[X] Nulls do NOT overlap exactly in all columns.\n\nRows with partial nulls (mismatch): {mismatch_count}"
                );
                if let Some(p) = preview {
                    out.push_str(&format!("\n{p}"));
                }
                out
            }
            EdaEvent::DuplicatesFound { count, rows } => format!(
                "Duplicate Rows based on data: {count} duplicates found.\nDuplicates found and will be removed:\n{rows}"
            ),
            EdaEvent::DuplicatesRemoved { .. } => "Duplicates removed.".to_string(),
            EdaEvent::NoDuplicates => {
                "Duplicate Rows based on data: 0 duplicates found.\nNo duplicates found. Data is clean."
                    .to_string()
            }
            EdaEvent::SchemaGenerated { json, .. } => format!(
                "=== Generated Avro Schema ===\n{json}\n============================="
            ),
            EdaEvent::SchemaSaved { path } => format!("Schema saved to: {}", path.display()),
        }
    }
}

impl EdaObserver for ConsoleObserver {
    fn on_event(&self, event: &EdaEvent) {
        println!("{}", Self::render(event));
    }

    fn on_failure(&self, ctx: &FileContext, _severity: Severity, error: &EdaError) {
        println!("Error reading file {}: {error}", ctx.path.display());
    }
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl EdaObserver for StdErrObserver {
    fn on_event(&self, event: &EdaEvent) {
        eprintln!("[eda][info] {event}");
    }

    fn on_failure(&self, ctx: &FileContext, severity: Severity, error: &EdaError) {
        eprintln!("[eda][{:?}] path={} err={}", severity, ctx.path.display(), error);
    }

    fn on_alert(&self, ctx: &FileContext, severity: Severity, error: &EdaError) {
        eprintln!(
            "[ALERT][eda][{:?}] path={} err={}",
            severity,
            ctx.path.display(),
            error
        );
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl EdaObserver for FileObserver {
    fn on_event(&self, event: &EdaEvent) {
        self.append_line(&format!("{} {event}", unix_ts()));
    }

    fn on_failure(&self, ctx: &FileContext, severity: Severity, error: &EdaError) {
        self.append_line(&format!(
            "{} fail severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &FileContext, severity: Severity, error: &EdaError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_critical() {
        let err = EdaError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(severity_for_error(&err), Severity::Critical);

        let err = EdaError::SchemaMismatch {
            message: "x".to_string(),
        };
        assert_eq!(severity_for_error(&err), Severity::Error);
        assert!(Severity::Critical > Severity::Error);
    }

    #[test]
    fn console_renders_loader_confirmation() {
        let line = ConsoleObserver::render(&EdaEvent::TableLoaded {
            name: "orders".to_string(),
            path: PathBuf::from("x.csv"),
            rows: 1,
            columns: 1,
        });
        assert_eq!(line, "File orders loaded!");
    }

    #[test]
    fn console_renders_null_counts() {
        let text = ConsoleObserver::render(&EdaEvent::NullCounts {
            counts: vec![("a".to_string(), 2), ("b".to_string(), 0)],
        });
        assert!(text.contains(" - a: 2 nulls"));
        assert!(text.contains(" - b: 0 nulls"));
    }

    #[test]
    fn console_renders_check_verdicts() {
        let agree = ConsoleObserver::render(&EdaEvent::NullOverlap {
            all_equal: true,
            mismatch_count: 0,
            preview: None,
        });
        assert!(agree.ends_with("[V] All columns have nulls in the same rows."));

        let clean = ConsoleObserver::render(&EdaEvent::NoDuplicates);
        assert!(clean.ends_with("No duplicates found. Data is clean."));
        assert_eq!(
            ConsoleObserver::render(&EdaEvent::DuplicatesRemoved {
                removed: 1,
                remaining: 4
            }),
            "Duplicates removed."
        );
    }
}
