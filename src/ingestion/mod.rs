//! Loading delimited files into in-memory [`crate::types::DataSet`]s.
//!
//! - [`load_folder`] (from [`folder`]) loads every matching file in a directory into a named
//!   table, recording per-file outcomes
//! - [`csv`] parses a single file, inferring column types (or using an explicit schema)

pub mod csv;
pub mod folder;

pub use csv::{read_csv_from_path, read_csv_from_reader, read_csv_with_schema, CsvOptions};
pub use folder::{load_folder, matching_files, FolderLoad, LoadFailure, LoadOptions};
