//! Core data model types.
//!
//! Delimited files are loaded into an in-memory [`DataSet`]: an ordered [`Schema`] of typed
//! [`Field`]s plus row-major [`Value`] storage. Missing cells are [`Value::Null`] regardless of the
//! column type, so "is this cell missing" is answered by [`Value::is_null`] / [`DataSet::is_null`].

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{EdaError, EdaResult};

/// Display format used for timestamp cells.
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logical data type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Boolean.
    Bool,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Date/time without time zone.
    Timestamp,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// Returns true for integer and floating point columns.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }

    /// Short lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::Timestamp => "timestamp",
            DataType::Utf8 => "utf8",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Date/time.
    Timestamp(NaiveDateTime),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns true if this cell is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value (integers widen to `f64`).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{}", v.format(TIMESTAMP_DISPLAY_FORMAT)),
            Value::Utf8(v) => f.write_str(v),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_owned).collect()
    }

    /// Resolve a column name to its index.
    ///
    /// Unlike [`Schema::index_of`], an unknown name is an error listing the available columns.
    pub fn column_index(&self, name: &str) -> EdaResult<usize> {
        self.schema
            .index_of(name)
            .ok_or_else(|| EdaError::UnknownColumn {
                column: name.to_owned(),
                available: self.column_names(),
            })
    }

    /// Resolve several column names, preserving the given order.
    pub fn column_indices<S: AsRef<str>>(&self, names: &[S]) -> EdaResult<Vec<usize>> {
        names.iter().map(|n| self.column_index(n.as_ref())).collect()
    }

    /// Iterate the values of a single column.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| row.get(idx).unwrap_or(&Value::Null))
    }

    /// Returns true if the cell at (`row`, `col`) is missing.
    ///
    /// Out-of-range cells count as missing.
    pub fn is_null(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .is_none_or(Value::is_null)
    }

    /// One flag per row, true where the column is missing.
    pub fn null_mask(&self, col: usize) -> Vec<bool> {
        (0..self.row_count()).map(|row| self.is_null(row, col)).collect()
    }

    /// Number of missing cells in a column.
    pub fn null_count(&self, col: usize) -> usize {
        self.column_values(col).filter(|v| v.is_null()).count()
    }

    /// New dataset containing the rows at `indices`, in the given order.
    ///
    /// Indices past the end are skipped.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// New dataset containing at most the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }
}

/// Fixed-width text rendering with a positional index column, used for console previews.
impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let index_width = self.row_count().saturating_sub(1).to_string().len();
        let mut widths: Vec<usize> = self
            .schema
            .fields
            .iter()
            .map(|f| f.name.chars().count())
            .collect();
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        write!(f, "{:index_width$}", "")?;
        for (field, w) in self.schema.fields.iter().zip(widths.iter().copied()) {
            write!(f, "  {:>w$}", field.name)?;
        }
        for (i, row) in cells.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{i:<index_width$}")?;
            for (cell, w) in row.iter().zip(widths.iter().copied()) {
                write!(f, "  {cell:>w$}")?;
            }
        }
        if self.rows.is_empty() {
            write!(f, "\n(0 rows)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64),
                Field::new("city", DataType::Utf8),
            ]),
            vec![
                vec![Value::Int64(1), Value::Utf8("Hanoi".to_string())],
                vec![Value::Int64(2), Value::Null],
                vec![Value::Null, Value::Utf8("Hue".to_string())],
            ],
        )
    }

    #[test]
    fn null_mask_marks_missing_cells() {
        let ds = sample();
        assert_eq!(ds.null_mask(0), vec![false, false, true]);
        assert_eq!(ds.null_mask(1), vec![false, true, false]);
        assert_eq!(ds.null_count(1), 1);
        assert!(ds.is_null(99, 0));
    }

    #[test]
    fn column_index_reports_available_columns() {
        let ds = sample();
        assert_eq!(ds.column_index("city").unwrap(), 1);
        let msg = ds.column_index("zip").unwrap_err().to_string();
        assert!(msg.contains("unknown column 'zip'"));
        assert!(msg.contains("city"));
    }

    #[test]
    fn select_rows_keeps_requested_order() {
        let ds = sample();
        let out = ds.select_rows(&[2, 0, 7]);
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.rows[0][1], Value::Utf8("Hue".to_string()));
        assert_eq!(out.rows[1][0], Value::Int64(1));
    }

    #[test]
    fn display_renders_header_and_rows() {
        let text = sample().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("id"));
        assert!(lines[0].contains("city"));
        assert!(lines[2].contains("null"));
    }

    #[test]
    fn display_aligns_non_ascii_headers() {
        let ds = DataSet::new(
            Schema::new(vec![Field::new("thành phố", DataType::Utf8)]),
            vec![vec![Value::Utf8("Hà Nội".to_string())]],
        );
        let text = ds.to_string();
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert_eq!(widths, vec![12, 12]);
    }
}
