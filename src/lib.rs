//! `rust-eda-toolkit` is a small set of exploratory data analysis helpers for tables loaded from
//! delimited text files into an in-memory [`types::DataSet`].
//!
//! Each operation is independent and stateless:
//!
//! - [`ingestion::load_folder`]: load every `.csv` in a folder into named tables, with
//!   per-file outcomes
//! - [`profiling::quick_overview`]: descriptive statistics rendered to an HTML report, plus a
//!   small [`profiling::ProfileSummary`]
//! - [`processing::check_null_overlap`]: do several columns go missing on the same rows?
//! - [`processing::check_duplicates`]: report and drop duplicate rows by a key subset
//! - [`avro::convert_csv_to_avro`]: derive an Avro schema (nullable fields as
//!   `["null", T]` unions) and write it as `.avsc`
//!
//! ## Data model
//!
//! Column types are inferred while parsing and are one of:
//!
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Timestamp`]
//! - [`types::DataType::Utf8`]
//!
//! Empty cells and common null tokens (`NA`, `NaN`, `null`, ...) become [`types::Value::Null`].
//!
//! ## Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rust_eda_toolkit::avro::{convert_csv_to_avro, AvroOptions};
//! use rust_eda_toolkit::ingestion::{load_folder, LoadOptions};
//! use rust_eda_toolkit::observability::ConsoleObserver;
//! use rust_eda_toolkit::processing::{check_duplicates, ReportOptions};
//!
//! # fn main() -> Result<(), rust_eda_toolkit::EdaError> {
//! let console = Arc::new(ConsoleObserver);
//! let load = load_folder(
//!     "data/raw",
//!     &LoadOptions {
//!         observer: Some(console.clone()),
//!         ..Default::default()
//!     },
//! );
//!
//! let report_opts = ReportOptions {
//!     observer: Some(console.clone()),
//!     ..Default::default()
//! };
//! if let Some(orders) = load.tables.get("Customer_Orders") {
//!     let clean = check_duplicates(orders, &["order_id"], &report_opts)?;
//!     convert_csv_to_avro(
//!         &clean,
//!         "data/raw/Fecom Inc Customer Orders.csv",
//!         &AvroOptions {
//!             observer: Some(console),
//!             ..Default::default()
//!         },
//!     )?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: folder loading and delimited-text parsing
//! - [`profiling`]: statistics, HTML rendering, report viewers
//! - [`processing`]: null-overlap and duplicate checks
//! - [`avro`]: Avro schema derivation
//! - [`naming`]: file-name conventions for table and schema names
//! - [`observability`]: observer hooks (console, stderr, file)
//! - [`types`]: schema + in-memory dataset types
//! - [`error`]: error types

pub mod avro;
pub mod error;
pub mod ingestion;
pub mod naming;
pub mod observability;
pub mod processing;
pub mod profiling;
pub mod types;

pub use error::{EdaError, EdaResult};
