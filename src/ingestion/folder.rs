//! Bulk loading of every delimited file in a folder.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{EdaError, EdaResult};
use crate::naming::NamingConvention;
use crate::observability::{emit, severity_for_error, EdaEvent, EdaObserver, FileContext, Severity};
use crate::types::DataSet;

use super::csv::{read_csv_from_path, CsvOptions};

/// Default extension of files picked up by [`load_folder`].
pub const DEFAULT_EXTENSION: &str = ".csv";

/// Options controlling [`load_folder`].
#[derive(Clone)]
pub struct LoadOptions {
    /// Only files whose name ends with this are loaded.
    pub extension: String,
    /// Parsing options applied to every file.
    pub csv: CsvOptions,
    /// How table names are derived from file names.
    pub naming: NamingConvention,
    /// Optional observer for confirmations, failures, and alerts.
    pub observer: Option<Arc<dyn EdaObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("extension", &self.extension)
            .field("csv", &self.csv)
            .field("naming", &self.naming)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            csv: CsvOptions::default(),
            naming: NamingConvention::default(),
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// A file that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    /// The file (or the folder itself, if it could not be scanned).
    pub path: PathBuf,
    /// Severity computed for the error.
    pub severity: Severity,
    /// What went wrong.
    pub error: EdaError,
}

/// Per-file outcome of a folder load.
#[derive(Debug, Default)]
pub struct FolderLoad {
    /// Successfully loaded tables keyed by derived name, in load order.
    pub tables: IndexMap<String, DataSet>,
    /// Files that failed to load.
    pub failures: Vec<LoadFailure>,
}

impl FolderLoad {
    /// True when every matched file loaded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// All-or-nothing view: the tables if every file loaded, otherwise `None`.
    pub fn into_tables(self) -> Option<IndexMap<String, DataSet>> {
        if self.is_complete() {
            Some(self.tables)
        } else {
            None
        }
    }
}

/// Load every file in `folder` whose name ends with [`LoadOptions::extension`].
///
/// Files are visited in path order. Each is parsed with [`read_csv_from_path`] and stored under
/// the name derived by [`NamingConvention::table_name`]; a later file whose name collides with
/// an earlier one replaces it.
///
/// Failures never stop the sweep: each one is recorded in [`FolderLoad::failures`] and reported
/// to the observer. Use [`FolderLoad::into_tables`] for an all-or-nothing result.
///
/// The default options carry no observer, so nothing is printed. Set
/// [`LoadOptions::observer`] to a [`ConsoleObserver`](crate::observability::ConsoleObserver) for
/// one `File <name> loaded!` line per table.
///
/// ```no_run
/// use rust_eda_toolkit::ingestion::{load_folder, LoadOptions};
///
/// let load = load_folder("data/raw", &LoadOptions::default());
/// for failure in &load.failures {
///     eprintln!("{}: {}", failure.path.display(), failure.error);
/// }
/// if let Some(tables) = load.into_tables() {
///     println!("loaded {} tables", tables.len());
/// }
/// ```
pub fn load_folder(folder: impl AsRef<Path>, options: &LoadOptions) -> FolderLoad {
    let folder = folder.as_ref();
    let mut out = FolderLoad::default();

    let paths = match matching_files(folder, &options.extension) {
        Ok(paths) => paths,
        Err(e) => {
            record_failure(&mut out, folder.to_path_buf(), e, options);
            return out;
        }
    };

    for path in paths {
        match load_one(&path, options) {
            Ok((name, ds)) => {
                emit(
                    &options.observer,
                    EdaEvent::TableLoaded {
                        name: name.clone(),
                        path: path.clone(),
                        rows: ds.row_count(),
                        columns: ds.column_count(),
                    },
                );
                out.tables.insert(name, ds);
            }
            Err(e) => record_failure(&mut out, path, e, options),
        }
    }

    out
}

/// Paths in `folder` ending with `extension`, sorted.
///
/// A folder that does not exist is an I/O error rather than an empty match.
pub fn matching_files(folder: &Path, extension: &str) -> EdaResult<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(EdaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", folder.display()),
        )));
    }
    let pattern = Path::new(&glob::Pattern::escape(&folder.to_string_lossy()))
        .join(format!("*{}", glob::Pattern::escape(extension)));
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn load_one(path: &Path, options: &LoadOptions) -> EdaResult<(String, DataSet)> {
    let derived = options.naming.table_name(path)?;
    if !derived.follows_convention {
        emit(
            &options.observer,
            EdaEvent::NameFallback {
                path: path.to_path_buf(),
                used: derived.name.clone(),
            },
        );
    }
    let ds = read_csv_from_path(path, &options.csv)?;
    Ok((derived.name, ds))
}

fn record_failure(out: &mut FolderLoad, path: PathBuf, error: EdaError, options: &LoadOptions) {
    let severity = severity_for_error(&error);
    if let Some(obs) = options.observer.as_ref() {
        let ctx = FileContext { path: path.clone() };
        obs.on_failure(&ctx, severity, &error);
        if severity >= options.alert_at_or_above {
            obs.on_alert(&ctx, severity, &error);
        }
    }
    out.failures.push(LoadFailure {
        path,
        severity,
        error,
    });
}
