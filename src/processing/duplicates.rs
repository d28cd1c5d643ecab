//! Duplicate detection and removal by a key subset.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::error::EdaResult;
use crate::observability::{emit, EdaEvent};
use crate::types::{DataSet, Value};

use super::ReportOptions;

/// Which members of a duplicate group [`duplicated`] marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keep {
    /// Mark every occurrence except the first.
    First,
    /// Mark every member of every group, first occurrence included.
    None,
}

/// Summary of duplicates on a key.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateReport {
    /// Rows that repeat an earlier row's key.
    pub duplicate_count: usize,
    /// Every row belonging to a duplicate group, in original order.
    pub duplicate_rows: DataSet,
}

/// Hashable view of a cell; nulls compare equal to each other.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) enum KeyCell<'a> {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(u64),
    Timestamp(NaiveDateTime),
    Utf8(&'a str),
}

impl<'a> From<&'a Value> for KeyCell<'a> {
    fn from(v: &'a Value) -> Self {
        match v {
            Value::Null => KeyCell::Null,
            Value::Bool(b) => KeyCell::Bool(*b),
            Value::Int64(i) => KeyCell::Int64(*i),
            // -0.0 and 0.0 are the same key.
            Value::Float64(f) if *f == 0.0 => KeyCell::Float64(0f64.to_bits()),
            Value::Float64(f) => KeyCell::Float64(f.to_bits()),
            Value::Timestamp(t) => KeyCell::Timestamp(*t),
            Value::Utf8(s) => KeyCell::Utf8(s.as_str()),
        }
    }
}

/// Group id per row: rows with equal keys share an id, ids assigned in first-seen order.
fn group_ids<S: AsRef<str>>(dataset: &DataSet, columns: &[S]) -> EdaResult<(Vec<usize>, Vec<usize>)> {
    // No key columns means "compare whole rows".
    let idxs: Vec<usize> = if columns.is_empty() {
        (0..dataset.column_count()).collect()
    } else {
        dataset.column_indices(columns)?
    };

    let mut seen: HashMap<Vec<KeyCell<'_>>, usize> = HashMap::new();
    let mut ids = Vec::with_capacity(dataset.row_count());
    let mut sizes: Vec<usize> = Vec::new();
    for row in &dataset.rows {
        let key: Vec<KeyCell<'_>> = idxs
            .iter()
            .map(|&i| row.get(i).map_or(KeyCell::Null, KeyCell::from))
            .collect();
        let next = sizes.len();
        let id = *seen.entry(key).or_insert(next);
        if id == next {
            sizes.push(0);
        }
        sizes[id] += 1;
        ids.push(id);
    }
    Ok((ids, sizes))
}

/// One flag per row marking duplicates on `columns`.
///
/// An empty `columns` slice compares entire rows.
pub fn duplicated<S: AsRef<str>>(dataset: &DataSet, columns: &[S], keep: Keep) -> EdaResult<Vec<bool>> {
    let (ids, sizes) = group_ids(dataset, columns)?;
    let flags = match keep {
        Keep::First => {
            let mut first_seen = vec![false; sizes.len()];
            ids.iter()
                .map(|&id| std::mem::replace(&mut first_seen[id], true))
                .collect()
        }
        Keep::None => ids.iter().map(|&id| sizes[id] > 1).collect(),
    };
    Ok(flags)
}

/// Count duplicates on `columns` and collect every row involved.
pub fn find_duplicates<S: AsRef<str>>(dataset: &DataSet, columns: &[S]) -> EdaResult<DuplicateReport> {
    let later = duplicated(dataset, columns, Keep::First)?;
    let members = duplicated(dataset, columns, Keep::None)?;

    let member_rows: Vec<usize> = members
        .iter()
        .enumerate()
        .filter_map(|(i, &m)| m.then_some(i))
        .collect();

    Ok(DuplicateReport {
        duplicate_count: later.iter().filter(|d| **d).count(),
        duplicate_rows: dataset.select_rows(&member_rows),
    })
}

/// New dataset keeping only the first row of each key, in original order.
pub fn drop_duplicates<S: AsRef<str>>(dataset: &DataSet, columns: &[S]) -> EdaResult<DataSet> {
    let later = duplicated(dataset, columns, Keep::First)?;
    let keep: Vec<usize> = later
        .iter()
        .enumerate()
        .filter_map(|(i, &d)| (!d).then_some(i))
        .collect();
    Ok(dataset.select_rows(&keep))
}

/// Report duplicates on `columns` and return the deduplicated table.
///
/// When there are no duplicates the returned table equals the input.
///
/// Nothing is printed unless [`ReportOptions::observer`] is set; pass a
/// [`ConsoleObserver`](crate::observability::ConsoleObserver) to print the duplicate rows and
/// the removal summary.
pub fn check_duplicates<S: AsRef<str>>(
    dataset: &DataSet,
    columns: &[S],
    options: &ReportOptions,
) -> EdaResult<DataSet> {
    let report = find_duplicates(dataset, columns)?;
    if report.duplicate_count == 0 {
        emit(&options.observer, EdaEvent::NoDuplicates);
        return Ok(dataset.clone());
    }

    emit(
        &options.observer,
        EdaEvent::DuplicatesFound {
            count: report.duplicate_count,
            rows: report.duplicate_rows,
        },
    );
    let deduped = drop_duplicates(dataset, columns)?;
    emit(
        &options.observer,
        EdaEvent::DuplicatesRemoved {
            removed: report.duplicate_count,
            remaining: deduped.row_count(),
        },
    );
    Ok(deduped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema};

    fn orders() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("order_id", DataType::Int64),
            Field::new("customer", DataType::Utf8),
            Field::new("amount", DataType::Float64),
        ]);
        let row = |id: i64, c: &str, a: Option<f64>| {
            vec![
                Value::Int64(id),
                Value::Utf8(c.to_string()),
                a.map_or(Value::Null, Value::Float64),
            ]
        };
        DataSet::new(
            schema,
            vec![
                row(1, "an", Some(10.0)),
                row(2, "binh", None),
                row(1, "an", Some(12.0)),
                row(3, "chi", Some(0.0)),
                row(2, "binh", None),
                row(1, "an", Some(-0.0)),
            ],
        )
    }

    #[test]
    fn keep_first_marks_later_occurrences() {
        let flags = duplicated(&orders(), &["order_id"], Keep::First).unwrap();
        assert_eq!(flags, vec![false, false, true, false, true, true]);
    }

    #[test]
    fn keep_none_marks_whole_groups() {
        let flags = duplicated(&orders(), &["order_id"], Keep::None).unwrap();
        assert_eq!(flags, vec![true, true, true, false, true, true]);
    }

    #[test]
    fn nulls_and_signed_zero_compare_equal() {
        let ds = orders();
        let flags = duplicated(&ds, &["amount"], Keep::First).unwrap();
        // row 4 repeats row 1's null; row 5's -0.0 repeats row 3's 0.0
        assert_eq!(flags, vec![false, false, false, false, true, true]);
    }

    #[test]
    fn empty_key_compares_whole_rows() {
        let none: [&str; 0] = [];
        let flags = duplicated(&orders(), &none, Keep::First).unwrap();
        assert_eq!(flags, vec![false, false, false, false, true, false]);
    }

    #[test]
    fn drop_keeps_first_occurrence_in_order() {
        let out = drop_duplicates(&orders(), &["order_id"]).unwrap();
        assert_eq!(out.row_count(), 3);
        let ids: Vec<&Value> = out.column_values(0).collect();
        assert_eq!(ids, vec![&Value::Int64(1), &Value::Int64(2), &Value::Int64(3)]);
        assert_eq!(out.rows[0][2], Value::Float64(10.0));
    }

    #[test]
    fn report_counts_and_lists_members() {
        let report = find_duplicates(&orders(), &["order_id", "customer"]).unwrap();
        assert_eq!(report.duplicate_count, 3);
        assert_eq!(report.duplicate_rows.row_count(), 5);
    }

    #[test]
    fn check_returns_input_when_clean() {
        let ds = orders();
        let out = check_duplicates(&ds, &["order_id", "amount"], &ReportOptions::default()).unwrap();
        // (2, null) repeats; nothing else does.
        assert_eq!(out.row_count(), 5);

        let clean = drop_duplicates(&ds, &["order_id"]).unwrap();
        let again = check_duplicates(&clean, &["order_id"], &ReportOptions::default()).unwrap();
        assert_eq!(again, clean);
    }
}
