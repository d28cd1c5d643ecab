//! Data-quality checks over an in-memory [`crate::types::DataSet`].
//!
//! - [`check_null_overlap()`]: do the given columns go missing on exactly the same rows?
//! - [`check_duplicates()`]: count, report, and drop duplicate rows by a key subset
//!
//! Both return structured results and report to the observer on [`ReportOptions`]; neither
//! mutates its input.
//!
//! ```rust
//! use rust_eda_toolkit::processing::{check_duplicates, check_null_overlap, ReportOptions};
//! use rust_eda_toolkit::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("order_id", DataType::Int64),
//!         Field::new("zip", DataType::Utf8),
//!         Field::new("city", DataType::Utf8),
//!     ]),
//!     vec![
//!         vec![Value::Int64(1), Value::Null, Value::Null],
//!         vec![Value::Int64(2), Value::Utf8("100000".into()), Value::Utf8("Hanoi".into())],
//!         vec![Value::Int64(2), Value::Utf8("100000".into()), Value::Utf8("Hanoi".into())],
//!     ],
//! );
//!
//! let opts = ReportOptions::default();
//! let overlap = check_null_overlap(&ds, &["zip", "city"], &opts).unwrap();
//! assert!(overlap.all_equal);
//!
//! let deduped = check_duplicates(&ds, &["order_id"], &opts).unwrap();
//! assert_eq!(deduped.row_count(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::observability::EdaObserver;

pub mod duplicates;
pub mod nulls;

pub use duplicates::{
    check_duplicates, drop_duplicates, duplicated, find_duplicates, DuplicateReport, Keep,
};
pub use nulls::{check_null_overlap, NullOverlapReport};

/// Default number of mismatching rows included in a null-overlap preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Options shared by the reporting checks.
#[derive(Clone)]
pub struct ReportOptions {
    /// Maximum rows kept in previews.
    pub preview_rows: usize,
    /// Optional observer that receives the report events. `None` (the default) prints nothing;
    /// use [`ConsoleObserver`](crate::observability::ConsoleObserver) for console output.
    pub observer: Option<Arc<dyn EdaObserver>>,
}

impl fmt::Debug for ReportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportOptions")
            .field("preview_rows", &self.preview_rows)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            observer: None,
        }
    }
}
