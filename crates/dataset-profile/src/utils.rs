//! Shared utilities for the profiling checks.
//!
//! Every check needs the same few primitives: deciding whether a cell is
//! missing, reading a column as numbers, and comparing cells for equality
//! independent of their physical dtype. They live here so that the checks
//! agree on those definitions.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for profiling purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types (including the all-null `Null` dtype)
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Characters commonly used in numeric formatting that should be stripped.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Markers that data providers use in place of a value.
pub const ERROR_MARKERS: [&str; 12] = [
    "error",
    "unknown",
    "n/a",
    "na",
    "nan",
    "null",
    "missing",
    "none",
    "#n/a",
    "<na>",
    "not available",
    "-",
];

/// Clean a string for numeric parsing by removing formatting characters.
///
/// # Example
///
/// ```rust,ignore
/// use dataset_profile::utils::clean_numeric_string;
///
/// assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
/// assert_eq!(clean_numeric_string("  42%  "), "42");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    let mut result = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        result = result.replace(c, "");
    }
    result
}

/// Check if a string is a missing-value marker ("N/A", "null", ...).
pub fn is_error_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    ERROR_MARKERS.iter().any(|&marker| lower == marker)
}

/// Check if a text cell carries no value: blank or a missing-value marker.
#[inline]
pub fn is_blank_or_marker(s: &str) -> bool {
    s.trim().is_empty() || is_error_marker(s)
}

/// Try to parse a string as a numeric value (f64).
///
/// Handles common formatting like currency symbols, percentages, and thousands separators.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round to two decimal places, the precision reported for percentages.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Series Utilities
// =============================================================================

/// Per-row missing flags for a Series.
///
/// A cell is missing when it is null, `NaN` in a float column, or blank /
/// a missing-value marker in a string column.
pub fn missing_mask(series: &Series) -> PolarsResult<Vec<bool>> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            let floats = series.cast(&DataType::Float64)?;
            Ok(floats
                .f64()?
                .into_iter()
                .map(|v| v.is_none_or(f64::is_nan))
                .collect())
        }
        DtypeCategory::String => {
            let strings = series.cast(&DataType::String)?;
            Ok(strings
                .str()?
                .into_iter()
                .map(|v| v.is_none_or(is_blank_or_marker))
                .collect())
        }
        _ => Ok(series
            .is_null()
            .into_iter()
            .map(|v| v.unwrap_or(true))
            .collect()),
    }
}

/// Number of missing cells in a Series, per [`missing_mask`].
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    Ok(missing_mask(series)?.into_iter().filter(|&m| m).count())
}

/// Read a Series as numbers.
///
/// Native numeric columns are cast to `f64`. String columns are parsed cell
/// by cell; if any non-missing cell fails to parse the column is not numeric
/// and `None` is returned. Columns of other dtypes are numeric only when they
/// hold no values at all.
pub fn numeric_values(series: &Series) -> Option<Vec<Option<f64>>> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            let floats = series.cast(&DataType::Float64).ok()?;
            let values = floats
                .f64()
                .ok()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect();
            Some(values)
        }
        DtypeCategory::String => {
            let strings = series.cast(&DataType::String).ok()?;
            let mut values = Vec::with_capacity(strings.len());
            for cell in strings.str().ok()?.into_iter() {
                match cell {
                    Some(s) if !is_blank_or_marker(s) => values.push(Some(parse_numeric_string(s)?)),
                    _ => values.push(None),
                }
            }
            Some(values)
        }
        _ if series.null_count() == series.len() => Some(vec![None; series.len()]),
        _ => None,
    }
}

/// Comparable per-row keys for a Series, `None` for missing cells.
///
/// Numbers are rendered through `f64` so that `1` and `1.0` compare equal,
/// with `-0.0` folded into `0.0`. Text is trimmed and other dtypes use their
/// string cast.
pub fn cell_keys(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let mask = missing_mask(series)?;

    let rendered: Vec<Option<String>> = match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            let floats = series.cast(&DataType::Float64)?;
            floats
                .f64()?
                .into_iter()
                .map(|v| v.map(|x| format!("{}", if x == 0.0 { 0.0 } else { x })))
                .collect()
        }
        _ => {
            let strings = series.cast(&DataType::String)?;
            strings
                .str()?
                .into_iter()
                .map(|v| v.map(|s| s.trim().to_string()))
                .collect()
        }
    };

    Ok(rendered
        .into_iter()
        .zip(mask)
        .map(|(key, missing)| if missing { None } else { key })
        .collect())
}

/// Median of a slice of finite values, `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

// =============================================================================
// Tests
// =============================================================================
