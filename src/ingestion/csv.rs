//! Delimited-text ingestion with column type inference.
//!
//! Files are read with a header row. Every column's [`DataType`] is inferred from its non-missing
//! cells, trying the narrowest type first:
//!
//! 1. [`DataType::Bool`] when every cell is `true`/`false` (any case)
//! 2. [`DataType::Int64`]
//! 3. [`DataType::Float64`]
//! 4. [`DataType::Timestamp`] for ISO-like dates and date-times
//! 5. [`DataType::Utf8`] otherwise
//!
//! Type checks look at the cell with surrounding whitespace removed, but text cells keep their raw
//! contents: `" Hanoi"` and `"Hanoi"` are different values. A column with no values at all is read
//! as [`DataType::Float64`], unless the file has no data rows, in which case every column is
//! [`DataType::Utf8`]. A file without a header row is an error.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{EdaError, EdaResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Default delimiter for source files.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Cell contents treated as missing in addition to empty cells.
pub const DEFAULT_NULL_VALUES: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "#NA",
    "<NA>",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Options controlling how delimited text is parsed.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Cell contents that mean "missing", matched exactly. Empty cells are always missing.
    pub null_values: Vec<String>,
    /// Type date-like columns as [`DataType::Timestamp`].
    ///
    /// On by default, so ISO dates become Avro `timestamp-millis` fields. Set to false to read
    /// them as plain text, which derives an Avro `string` instead.
    pub infer_timestamps: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
            infer_timestamps: true,
        }
    }
}

impl CsvOptions {
    /// A reader builder configured with these options.
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder.delimiter(self.delimiter).has_headers(true);
        builder
    }

    fn is_missing(&self, raw: &str) -> bool {
        raw.is_empty() || self.null_values.iter().any(|n| n == raw)
    }
}

/// Read a delimited file into a [`DataSet`], inferring column types.
pub fn read_csv_from_path(path: impl AsRef<Path>, options: &CsvOptions) -> EdaResult<DataSet> {
    let mut rdr = options.reader_builder().from_path(path)?;
    read_csv_from_reader(&mut rdr, options)
}

/// Read delimited data from an existing reader, inferring column types.
///
/// Only [`CsvOptions::null_values`] and [`CsvOptions::infer_timestamps`] apply here; the
/// delimiter is whatever `rdr` was built with.
pub fn read_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    options: &CsvOptions,
) -> EdaResult<DataSet> {
    let headers = rdr.headers()?;
    if headers.is_empty() {
        return Err(EdaError::SchemaMismatch {
            message: "no columns to parse: the input has no header row".to_string(),
        });
    }
    let names = dedupe_headers(headers.iter());
    let records = rdr.records().collect::<Result<Vec<_>, _>>()?;

    let fields: Vec<Field> = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            if records.is_empty() {
                return Field::new(name, DataType::Utf8);
            }
            let cells = records.iter().map(|r| r.get(idx).unwrap_or(""));
            Field::new(name, infer_type(cells, options))
        })
        .collect();

    let mut rows = Vec::with_capacity(records.len());
    for (row_idx0, record) in records.iter().enumerate() {
        // 1-based, plus the header line.
        let user_row = row_idx0 + 2;
        let mut row = Vec::with_capacity(fields.len());
        for (idx, field) in fields.iter().enumerate() {
            let raw = record.get(idx).unwrap_or("");
            if options.is_missing(raw) {
                row.push(Value::Null);
            } else {
                row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
            }
        }
        rows.push(row);
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

/// Read delimited data against a caller-provided [`Schema`] instead of inferring types.
///
/// Rules:
///
/// - Headers must contain all schema fields (order can differ).
/// - Each value is parsed according to the schema field type.
pub fn read_csv_with_schema<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
    options: &CsvOptions,
) -> EdaResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(EdaError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            if options.is_missing(raw) {
                row.push(Value::Null);
            } else {
                row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
            }
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Repeated header names get a `.N` suffix so every column stays addressable.
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .map(|h| {
            let n = seen.entry(h.to_string()).or_insert(0);
            let name = if *n == 0 {
                h.to_string()
            } else {
                format!("{h}.{n}")
            };
            *n += 1;
            name
        })
        .collect()
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a str>, options: &CsvOptions) -> DataType {
    let mut any = false;
    let mut bool_ok = true;
    let mut int_ok = true;
    let mut float_ok = true;
    let mut ts_ok = options.infer_timestamps;

    for raw in cells {
        if options.is_missing(raw) {
            continue;
        }
        any = true;
        let s = raw.trim();
        bool_ok = bool_ok && parse_bool_literal(s).is_some();
        int_ok = int_ok && s.parse::<i64>().is_ok();
        float_ok = float_ok && s.parse::<f64>().is_ok();
        ts_ok = ts_ok && parse_timestamp(s).is_some();
        if !(bool_ok || int_ok || float_ok || ts_ok) {
            return DataType::Utf8;
        }
    }

    if !any {
        DataType::Float64
    } else if bool_ok {
        DataType::Bool
    } else if int_ok {
        DataType::Int64
    } else if float_ok {
        DataType::Float64
    } else if ts_ok {
        DataType::Timestamp
    } else {
        DataType::Utf8
    }
}

fn parse_typed_value(row: usize, column: &str, data_type: DataType, raw: &str) -> EdaResult<Value> {
    let trimmed = raw.trim();
    let parse_err = |message: String| EdaError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(raw.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_err),
        DataType::Timestamp => parse_timestamp(trimmed)
            .map(Value::Timestamp)
            .ok_or_else(|| parse_err("expected date or date-time (YYYY-MM-DD[ HH:MM:SS])".to_string())),
    }
}

fn parse_bool_literal(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
