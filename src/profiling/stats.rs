//! Descriptive statistics behind a profiling report.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::EdaResult;
use crate::processing::duplicates::{duplicated, KeyCell, Keep};
use crate::types::{DataSet, DataType, Value};

/// Everything a report shows for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    /// Report heading, e.g. `EDA Report - orders`.
    pub title: String,
    /// Table-level figures.
    pub overview: Overview,
    /// One profile per column, in column order.
    pub columns: Vec<ColumnProfile>,
    /// Correlations between numeric columns.
    pub correlations: CorrelationMatrix,
    /// Co-missing column sets, most frequent first.
    pub missing_patterns: Vec<MissingPattern>,
}

/// Table-level figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Row count.
    pub rows: usize,
    /// Column count.
    pub columns: usize,
    /// Missing cells across the whole table.
    pub missing_cells: usize,
    /// Percentage of all cells that are missing.
    pub missing_cells_pct: f64,
    /// Rows that repeat an earlier row exactly.
    pub duplicate_rows: usize,
    /// Number of columns of each type, in first-seen order.
    pub type_counts: IndexMap<DataType, usize>,
}

/// Per-column figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Inferred column type.
    pub data_type: DataType,
    /// Non-missing values.
    pub count: usize,
    /// Missing values.
    pub missing: usize,
    /// Percentage of rows that are missing.
    pub missing_pct: f64,
    /// Distinct non-missing values.
    pub distinct: usize,
    /// Summary for the column's type.
    pub stats: ColumnStats,
}

/// Type-specific summary of a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStats {
    /// Integer and float columns.
    Numeric(NumericSummary),
    /// Counts of each boolean value.
    Boolean {
        true_count: usize,
        false_count: usize,
    },
    /// Earliest and latest timestamp.
    Temporal {
        min: NaiveDateTime,
        max: NaiveDateTime,
    },
    /// Text columns.
    Text(TextSummary),
    /// The column has no values.
    Empty,
}

/// Location and spread of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std: Option<f64>,
    /// Smallest value.
    pub min: f64,
    /// 25th percentile (linear interpolation).
    pub q25: f64,
    /// 50th percentile.
    pub median: f64,
    /// 75th percentile.
    pub q75: f64,
    /// Largest value.
    pub max: f64,
    /// Values equal to zero.
    pub zeros: usize,
    /// Values below zero.
    pub negatives: usize,
}

/// Length and frequency figures for a text column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSummary {
    /// Shortest value, in characters.
    pub min_length: usize,
    /// Longest value, in characters.
    pub max_length: usize,
    /// Mean length, in characters.
    pub mean_length: f64,
    /// Most frequent values, most common first.
    pub top_values: Vec<ValueCount>,
}

/// A value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    /// The value as displayed.
    pub value: String,
    /// Occurrences.
    pub count: usize,
}

/// Pearson correlations between numeric columns.
///
/// Each pair uses the rows where both columns are present; a cell is `None` when fewer than two
/// such rows exist or either side is constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Numeric column names; both axes use this order.
    pub columns: Vec<String>,
    /// `values[i][j]` is the coefficient between `columns[i]` and `columns[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

/// A set of columns that are missing together, and on how many rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingPattern {
    /// Missing columns; empty for fully populated rows.
    pub columns: Vec<String>,
    /// Rows with exactly this pattern.
    pub rows: usize,
}

/// Compute the full report for `dataset`.
///
/// `top_n` bounds the number of frequent values listed for text columns.
pub fn build_report(dataset: &DataSet, title: &str, top_n: usize) -> EdaResult<ProfileReport> {
    let whole_row: [&str; 0] = [];
    let duplicate_rows = duplicated(dataset, &whole_row, Keep::First)?
        .into_iter()
        .filter(|d| *d)
        .count();

    let columns: Vec<ColumnProfile> = (0..dataset.column_count())
        .map(|idx| profile_column(dataset, idx, top_n))
        .collect();

    let mut type_counts = IndexMap::new();
    for field in &dataset.schema.fields {
        *type_counts.entry(field.data_type).or_insert(0) += 1;
    }

    let missing_cells: usize = columns.iter().map(|c| c.missing).sum();
    let overview = Overview {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        missing_cells,
        missing_cells_pct: pct(missing_cells, dataset.row_count() * dataset.column_count()),
        duplicate_rows,
        type_counts,
    };

    Ok(ProfileReport {
        title: title.to_string(),
        overview,
        columns,
        correlations: correlations(dataset),
        missing_patterns: missing_patterns(dataset),
    })
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn profile_column(dataset: &DataSet, idx: usize, top_n: usize) -> ColumnProfile {
    let field = &dataset.schema.fields[idx];
    let present: Vec<&Value> = dataset.column_values(idx).filter(|v| !v.is_null()).collect();
    let missing = dataset.row_count() - present.len();
    let distinct = present
        .iter()
        .map(|v| KeyCell::from(*v))
        .collect::<HashSet<_>>()
        .len();

    let stats = if present.is_empty() {
        ColumnStats::Empty
    } else {
        match field.data_type {
            DataType::Int64 | DataType::Float64 => {
                let values: Vec<f64> = present.iter().filter_map(|v| v.as_f64()).collect();
                numeric_summary(values).map_or(ColumnStats::Empty, ColumnStats::Numeric)
            }
            DataType::Bool => {
                let true_count = present.iter().filter(|v| matches!(v, Value::Bool(true))).count();
                ColumnStats::Boolean {
                    true_count,
                    false_count: present.len() - true_count,
                }
            }
            DataType::Timestamp => {
                let stamps: Vec<NaiveDateTime> = present
                    .iter()
                    .filter_map(|v| match v {
                        Value::Timestamp(t) => Some(*t),
                        _ => None,
                    })
                    .collect();
                match (stamps.iter().min(), stamps.iter().max()) {
                    (Some(min), Some(max)) => ColumnStats::Temporal {
                        min: *min,
                        max: *max,
                    },
                    _ => ColumnStats::Empty,
                }
            }
            DataType::Utf8 => ColumnStats::Text(text_summary(&present, top_n)),
        }
    };

    ColumnProfile {
        name: field.name.clone(),
        data_type: field.data_type,
        count: present.len(),
        missing,
        missing_pct: pct(missing, dataset.row_count()),
        distinct,
        stats,
    }
}

fn numeric_summary(mut values: Vec<f64>) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.len() > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    });

    Some(NumericSummary {
        mean,
        std,
        min: values[0],
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values[values.len() - 1],
        zeros: values.iter().filter(|v| **v == 0.0).count(),
        negatives: values.iter().filter(|v| **v < 0.0).count(),
    })
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn text_summary(present: &[&Value], top_n: usize) -> TextSummary {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut lengths = Vec::with_capacity(present.len());
    for v in present {
        let s = v.to_string();
        lengths.push(s.chars().count());
        *counts.entry(s).or_insert(0) += 1;
    }

    let mut top_values: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    top_values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    top_values.truncate(top_n);

    TextSummary {
        min_length: lengths.iter().copied().min().unwrap_or(0),
        max_length: lengths.iter().copied().max().unwrap_or(0),
        mean_length: lengths.iter().sum::<usize>() as f64 / lengths.len().max(1) as f64,
        top_values,
    }
}

fn correlations(dataset: &DataSet) -> CorrelationMatrix {
    let numeric: Vec<usize> = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.data_type.is_numeric().then_some(i))
        .collect();
    let series: Vec<Vec<Option<f64>>> = numeric
        .iter()
        .map(|&i| dataset.column_values(i).map(Value::as_f64).collect())
        .collect();

    let values = series
        .iter()
        .map(|a| series.iter().map(|b| pearson(a, b)).collect())
        .collect();

    CorrelationMatrix {
        columns: numeric
            .iter()
            .map(|&i| dataset.schema.fields[i].name.clone())
            .collect(),
        values,
    }
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

fn missing_patterns(dataset: &DataSet) -> Vec<MissingPattern> {
    let mut counts: HashMap<Vec<usize>, usize> = HashMap::new();
    for row in 0..dataset.row_count() {
        let missing: Vec<usize> = (0..dataset.column_count())
            .filter(|&col| dataset.is_null(row, col))
            .collect();
        *counts.entry(missing).or_insert(0) += 1;
    }

    let mut patterns: Vec<(Vec<usize>, usize)> = counts.into_iter().collect();
    patterns.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    patterns
        .into_iter()
        .map(|(cols, rows)| MissingPattern {
            columns: cols
                .into_iter()
                .map(|c| dataset.schema.fields[c].name.clone())
                .collect(),
            rows,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Schema};

    fn sample() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("x", DataType::Int64),
                Field::new("y", DataType::Float64),
                Field::new("tag", DataType::Utf8),
                Field::new("ok", DataType::Bool),
            ]),
            vec![
                vec![Value::Int64(1), Value::Float64(2.0), Value::Utf8("a".into()), Value::Bool(true)],
                vec![Value::Int64(2), Value::Float64(4.0), Value::Utf8("b".into()), Value::Bool(false)],
                vec![Value::Int64(3), Value::Float64(6.0), Value::Utf8("a".into()), Value::Null],
                vec![Value::Int64(4), Value::Null, Value::Null, Value::Null],
            ],
        )
    }

    #[test]
    fn numeric_summary_uses_linear_quantiles() {
        let s = numeric_summary(vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q25, 1.75);
        assert_eq!(s.q75, 3.25);
        let std = s.std.unwrap();
        assert!((std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_no_std() {
        let s = numeric_summary(vec![7.0]).unwrap();
        assert_eq!(s.std, None);
        assert_eq!(s.q25, 7.0);
    }

    #[test]
    fn perfectly_linear_columns_correlate() {
        let report = build_report(&sample(), "t", 5).unwrap();
        assert_eq!(report.correlations.columns, vec!["x", "y"]);
        let r = report.correlations.values[0][1].unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn column_profiles_count_missing_and_distinct() {
        let report = build_report(&sample(), "t", 5).unwrap();
        let tag = &report.columns[2];
        assert_eq!(tag.count, 3);
        assert_eq!(tag.missing, 1);
        assert_eq!(tag.distinct, 2);
        match &tag.stats {
            ColumnStats::Text(t) => {
                assert_eq!(t.top_values[0], ValueCount { value: "a".into(), count: 2 });
            }
            other => panic!("unexpected stats {other:?}"),
        }
        match &report.columns[3].stats {
            ColumnStats::Boolean { true_count, false_count } => {
                assert_eq!((*true_count, *false_count), (1, 1));
            }
            other => panic!("unexpected stats {other:?}"),
        }
    }

    #[test]
    fn overview_and_missing_patterns() {
        let report = build_report(&sample(), "t", 5).unwrap();
        assert_eq!(report.overview.rows, 4);
        assert_eq!(report.overview.missing_cells, 4);
        assert_eq!(report.overview.missing_cells_pct, 25.0);
        assert_eq!(report.overview.duplicate_rows, 0);
        assert_eq!(report.overview.type_counts[&DataType::Int64], 1);

        // Two fully populated rows come first.
        assert_eq!(report.missing_patterns[0].columns, Vec::<String>::new());
        assert_eq!(report.missing_patterns[0].rows, 2);
        assert_eq!(report.missing_patterns.len(), 3);
    }
}
