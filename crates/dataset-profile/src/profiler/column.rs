//! Column-level checks: temporal coverage and per-entity description text.

use super::temporal::{Interval, infer_interval};
use crate::dataset::ColumnView;
use crate::error::Result;
use crate::metadata::{Metadata, MetadataKey, find_record, parse_description};
use chrono::NaiveDate;

/// Free text the Description field holds about `entity`.
///
/// Returns the text of the matching record with the entity token and its
/// `;` separator removed, or an empty string when Description is missing or
/// mentions no such entity.
pub fn extract_entity_description(entity: &str, metadata: &Metadata) -> String {
    let Some(description) = metadata.text(MetadataKey::Description) else {
        return String::new();
    };
    let records = parse_description(description);
    find_record(&records, entity)
        .map(|record| record.text.to_string())
        .unwrap_or_default()
}

/// Maximal runs of consecutive non-missing periods, as
/// `"YYYY-MM-DD - YYYY-MM-DD"` strings in chronological order.
///
/// A run breaks at a missing value and wherever the next reported date is
/// not the period directly after the previous one. The period length is the
/// index's inferred frequency, monthly when it cannot be inferred. A lone
/// value forms a run of its own (`"X - X"`). Columns without a date index
/// have no windows.
pub fn coverage_windows(column: ColumnView<'_>) -> Result<Vec<String>> {
    let Some(dates) = column.index().dates() else {
        return Ok(Vec::new());
    };
    let missing = column.missing_mask()?;
    let step = infer_interval(dates)
        .filter(|interval| *interval != Interval::Irregular)
        .unwrap_or(Interval::Monthly);

    let mut cells: Vec<(NaiveDate, bool)> = dates.iter().copied().zip(missing).collect();
    cells.sort_by_key(|(date, _)| *date);

    let mut windows = Vec::new();
    let mut run: Option<(NaiveDate, NaiveDate)> = None;

    for (date, is_missing) in cells {
        if is_missing {
            if let Some((start, end)) = run.take() {
                windows.push(format_window(start, end));
            }
            continue;
        }
        run = match run {
            Some((start, end)) if step.is_next_period(end, date) => Some((start, date)),
            Some((start, end)) => {
                windows.push(format_window(start, end));
                Some((date, date))
            }
            None => Some((date, date)),
        };
    }
    if let Some((start, end)) = run {
        windows.push(format_window(start, end));
    }

    Ok(windows)
}

fn format_window(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
}
