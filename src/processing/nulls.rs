//! Null co-occurrence across a set of columns.

use crate::error::EdaResult;
use crate::observability::{emit, EdaEvent};
use crate::types::DataSet;

use super::ReportOptions;

/// Result of [`check_null_overlap`].
#[derive(Debug, Clone, PartialEq)]
pub struct NullOverlapReport {
    /// Missing-value count per column, in the requested order.
    pub null_counts: Vec<(String, usize)>,
    /// True when every column is missing on exactly the same rows.
    pub all_equal: bool,
    /// Rows where some, but not all, of the columns are missing (ascending).
    pub mismatch_rows: Vec<usize>,
    /// The first [`ReportOptions::preview_rows`] mismatching rows; `None` when `all_equal`.
    pub preview: Option<DataSet>,
}

/// Check whether `columns` have missing values on the same rows.
///
/// With zero or one column there is nothing to compare and the result is trivially
/// `all_equal`. Unknown column names are an error.
///
/// Nothing is printed unless [`ReportOptions::observer`] is set; pass a
/// [`ConsoleObserver`](crate::observability::ConsoleObserver) for the per-column counts and the
/// `[V]`/`[X]` verdict on stdout.
pub fn check_null_overlap<S: AsRef<str>>(
    dataset: &DataSet,
    columns: &[S],
    options: &ReportOptions,
) -> EdaResult<NullOverlapReport> {
    let idxs = dataset.column_indices(columns)?;
    let masks: Vec<Vec<bool>> = idxs.iter().map(|&i| dataset.null_mask(i)).collect();

    let null_counts: Vec<(String, usize)> = columns
        .iter()
        .zip(&masks)
        .map(|(name, mask)| (name.as_ref().to_string(), mask.iter().filter(|m| **m).count()))
        .collect();
    emit(
        &options.observer,
        EdaEvent::NullCounts {
            counts: null_counts.clone(),
        },
    );

    let all_equal = match masks.split_first() {
        Some((first, rest)) => rest.iter().all(|m| m == first),
        None => true,
    };

    let (mismatch_rows, preview) = if all_equal {
        (Vec::new(), None)
    } else {
        let rows: Vec<usize> = (0..dataset.row_count())
            .filter(|&row| {
                let any = masks.iter().any(|m| m[row]);
                let all = masks.iter().all(|m| m[row]);
                any && !all
            })
            .collect();
        let shown = &rows[..rows.len().min(options.preview_rows)];
        let preview = dataset.select_rows(shown);
        (rows, Some(preview))
    };

    emit(
        &options.observer,
        EdaEvent::NullOverlap {
            all_equal,
            mismatch_count: mismatch_rows.len(),
            preview: preview.clone(),
        },
    );

    Ok(NullOverlapReport {
        null_counts,
        all_equal,
        mismatch_rows,
        preview,
    })
}
