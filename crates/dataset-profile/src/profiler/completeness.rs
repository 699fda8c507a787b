//! Completeness and uniqueness of the table as a whole.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::utils::{cell_keys, missing_count, round2};
use std::collections::HashSet;

/// Share of missing cells over all cells, in percent with two decimals.
///
/// `None` when the dataset has no cells.
pub fn null_percentage(dataset: &Dataset) -> Result<Option<f64>> {
    if dataset.is_empty() {
        return Ok(None);
    }

    let mut missing = 0usize;
    for column in dataset.columns() {
        missing += missing_count(column.series())?;
    }
    let total = dataset.height() * dataset.width();

    Ok(Some(round2(missing as f64 / total as f64 * 100.0)))
}

/// Share of columns whose non-missing values are pairwise distinct, in
/// percent with two decimals.
///
/// Columns without any value never count as unique. `None` when the
/// dataset has no columns or no column holds a value.
pub fn unique_percentage(dataset: &Dataset) -> Result<Option<f64>> {
    if dataset.width() == 0 {
        return Ok(None);
    }

    let mut unique = 0usize;
    let mut with_values = 0usize;

    for column in dataset.columns() {
        let keys: Vec<String> = cell_keys(column.series())?.into_iter().flatten().collect();
        if keys.is_empty() {
            continue;
        }
        with_values += 1;
        let distinct: HashSet<&String> = keys.iter().collect();
        if distinct.len() == keys.len() {
            unique += 1;
        }
    }

    if with_values == 0 {
        return Ok(None);
    }
    Ok(Some(round2(unique as f64 / dataset.width() as f64 * 100.0)))
}

/// Names of columns whose values repeat an earlier column cell for cell.
///
/// Missing cells compare equal to each other; the first occurrence of each
/// repeated column is not listed. `None` when the dataset has no cells.
pub fn duplicated_columns(dataset: &Dataset) -> Result<Option<Vec<String>>> {
    if dataset.is_empty() {
        return Ok(None);
    }

    let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();
    let mut duplicated = Vec::new();

    for column in dataset.columns() {
        let signature = cell_keys(column.series())?;
        if !seen.insert(signature) {
            duplicated.push(column.name().to_string());
        }
    }

    Ok(Some(duplicated))
}
