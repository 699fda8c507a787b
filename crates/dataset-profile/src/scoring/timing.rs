//! Upload-timing metrics relative to the stated creation date.

use crate::dataset::Dataset;
use crate::metadata::Metadata;
use crate::profiler::{months_between, time_range};
use crate::types::NOT_AVAILABLE;
use chrono::NaiveDate;

/// Whole months from the creation date to `reference_date`, as a plain
/// numeral, or "N/A" when Creation Year is missing or unreadable.
pub fn months_since_creation(metadata: &Metadata, reference_date: NaiveDate) -> String {
    metadata
        .creation_date()
        .map_or_else(
            || NOT_AVAILABLE.to_string(),
            |created| months_between(created, reference_date).to_string(),
        )
}

/// Signed months from the creation date to the last index date.
///
/// Positive when the data runs past the stated creation date. "N/A" when the
/// dataset has no date index or Creation Year is missing or unreadable.
pub fn upload_delay(dataset: &Dataset, metadata: &Metadata) -> String {
    match (metadata.creation_date(), time_range(dataset)) {
        (Some(created), Some(range)) => format!("{:+}", months_between(created, range.end)),
        _ => NOT_AVAILABLE.to_string(),
    }
}
