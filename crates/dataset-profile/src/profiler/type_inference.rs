//! Column classification for the data-type histogram.

use crate::dataset::{ColumnView, Dataset};
use crate::error::Result;
use crate::types::{ColumnKind, DataTypeHistogram};
use crate::utils::{cell_keys, numeric_values};
use std::collections::HashSet;
use tracing::debug;

/// Classify one column.
///
/// A column with at most one distinct non-missing value (an all-missing
/// column included) is [`ColumnKind::Const`]. Otherwise it is
/// [`ColumnKind::Num`] when every value reads as a number, either natively
/// or as numeric text, and [`ColumnKind::String`] when any does not.
pub fn classify_column(column: ColumnView<'_>) -> Result<ColumnKind> {
    let series = column.series();

    let keys = cell_keys(series)?;
    let distinct: HashSet<&str> = keys.iter().flatten().map(String::as_str).collect();
    if distinct.len() <= 1 {
        return Ok(ColumnKind::Const);
    }

    if numeric_values(series).is_some() {
        Ok(ColumnKind::Num)
    } else {
        Ok(ColumnKind::String)
    }
}

/// Count the dataset's columns per [`ColumnKind`].
///
/// All buckets are zero for a dataset without columns.
pub fn data_type_histogram(dataset: &Dataset) -> Result<DataTypeHistogram> {
    let mut histogram = DataTypeHistogram::default();
    for column in dataset.columns() {
        let kind = classify_column(column)?;
        debug!("Column '{}' classified as {:?}", column.name(), kind);
        histogram.record(kind);
    }
    Ok(histogram)
}
