//! Table profiling reports.
//!
//! [`quick_overview`] computes descriptive statistics for a table (see [`stats`]), writes them as
//! a self-contained document under [`ProfileOptions::output_dir`], optionally hands the document
//! to a [`ReportViewer`], and returns a small [`ProfileSummary`].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rust_eda_toolkit::ingestion::{read_csv_from_path, CsvOptions};
//! use rust_eda_toolkit::profiling::{quick_overview, ProfileOptions, SystemViewer};
//!
//! # fn main() -> Result<(), rust_eda_toolkit::EdaError> {
//! let path = "data/Fecom Inc Orders.csv";
//! let ds = read_csv_from_path(path, &CsvOptions::default())?;
//! let opts = ProfileOptions {
//!     viewer: Some(Arc::new(SystemViewer)),
//!     ..Default::default()
//! };
//! let summary = quick_overview(&ds, path, &opts)?;
//! println!("{} rows x {} columns", summary.shape.0, summary.shape.1);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::EdaResult;
use crate::naming::file_stem;
use crate::observability::{emit, EdaEvent, EdaObserver};
use crate::types::{DataSet, DataType};

pub mod html;
pub mod stats;
pub mod viewer;

pub use html::render_html;
pub use stats::{build_report, ColumnProfile, ColumnStats, ProfileReport};
pub use viewer::{ReportViewer, SystemViewer};

/// Default folder reports are written to.
pub const DEFAULT_REPORT_DIR: &str = "./Data_Report";

/// Default number of frequent values listed per text column.
pub const DEFAULT_TOP_VALUES: usize = 10;

/// Document format of a written report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Standalone HTML page.
    #[default]
    Html,
    /// The [`ProfileReport`] as pretty JSON.
    Json,
}

impl ReportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }
}

/// Options controlling [`quick_overview`].
#[derive(Clone)]
pub struct ProfileOptions {
    /// Folder reports are written to; created if missing.
    pub output_dir: PathBuf,
    /// Report document format.
    pub format: ReportFormat,
    /// Frequent values listed per text column.
    pub top_values: usize,
    /// If set, the written report is opened with it; otherwise only its path is reported.
    pub viewer: Option<Arc<dyn ReportViewer>>,
    /// Optional observer for the saved/opened events.
    pub observer: Option<Arc<dyn EdaObserver>>,
}

impl fmt::Debug for ProfileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileOptions")
            .field("output_dir", &self.output_dir)
            .field("format", &self.format)
            .field("top_values", &self.top_values)
            .field("viewer_set", &self.viewer.is_some())
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            format: ReportFormat::default(),
            top_values: DEFAULT_TOP_VALUES,
            viewer: None,
            observer: None,
        }
    }
}

/// Basic facts about a profiled table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    /// Source file name without extension.
    pub file_name: String,
    /// `(rows, columns)`.
    pub shape: (usize, usize),
    /// Column names in order.
    pub columns: Vec<String>,
    /// Column types, in column order.
    pub dtypes: IndexMap<String, DataType>,
    /// Where the report was written.
    pub report_path: PathBuf,
}

/// Profile `dataset` (loaded from `source_path`) and write the report.
///
/// The report is titled `EDA Report - <file name>` and written to
/// `<output_dir>/<file name>.<ext>`.
pub fn quick_overview(
    dataset: &DataSet,
    source_path: impl AsRef<Path>,
    options: &ProfileOptions,
) -> EdaResult<ProfileSummary> {
    let file_name = file_stem(source_path)?;
    fs::create_dir_all(&options.output_dir)?;

    let report = build_report(dataset, &format!("EDA Report - {file_name}"), options.top_values)?;
    let document = match options.format {
        ReportFormat::Html => render_html(&report),
        ReportFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    let report_path = options
        .output_dir
        .join(format!("{file_name}.{}", options.format.extension()));
    fs::write(&report_path, document)?;

    match options.viewer.as_ref() {
        Some(viewer) => {
            viewer.open(&report_path)?;
            emit(
                &options.observer,
                EdaEvent::ReportOpened {
                    path: report_path.clone(),
                },
            );
        }
        None => emit(
            &options.observer,
            EdaEvent::ReportSaved {
                path: report_path.clone(),
            },
        ),
    }

    Ok(ProfileSummary {
        file_name,
        shape: dataset.shape(),
        columns: dataset.column_names(),
        dtypes: dataset
            .schema
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.data_type))
            .collect(),
        report_path,
    })
}
