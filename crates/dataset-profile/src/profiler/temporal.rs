//! Time-axis checks: covered range and reporting frequency.

use crate::dataset::Dataset;
use crate::types::{NOT_AVAILABLE, TimeRange};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporting frequency of a date index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Semiannual,
    Yearly,
    /// Dates are spaced, but not at any calendar frequency.
    Irregular,
}

impl Interval {
    pub fn label(self) -> &'static str {
        match self {
            Interval::Daily => "Daily",
            Interval::Weekly => "Weekly",
            Interval::Monthly => "Monthly",
            Interval::Quarterly => "Quarterly",
            Interval::Semiannual => "Semiannual",
            Interval::Yearly => "Yearly",
            Interval::Irregular => "Irregular",
        }
    }

    /// Classify the spacing between two consecutive periods.
    pub fn from_spacing_days(days: i64) -> Self {
        match days {
            1 => Interval::Daily,
            7 => Interval::Weekly,
            28..=31 => Interval::Monthly,
            89..=92 => Interval::Quarterly,
            181..=184 => Interval::Semiannual,
            365 | 366 => Interval::Yearly,
            _ => Interval::Irregular,
        }
    }

    /// Whether `next` is the period directly following `prev`.
    ///
    /// Month-based frequencies compare calendar months so that month-end
    /// dates of different lengths still line up.
    pub fn is_next_period(self, prev: NaiveDate, next: NaiveDate) -> bool {
        match self {
            Interval::Daily => (next - prev).num_days() == 1,
            Interval::Weekly => (next - prev).num_days() == 7,
            Interval::Monthly => months_between(prev, next) == 1,
            Interval::Quarterly => months_between(prev, next) == 3,
            Interval::Semiannual => months_between(prev, next) == 6,
            Interval::Yearly => months_between(prev, next) == 12,
            Interval::Irregular => false,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whole calendar months from `from` to `to`, ignoring the day of month.
/// Negative when `to` is earlier.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}

/// Infer the frequency of a set of dates from their smallest positive
/// spacing, so that missing periods do not hide the native granularity.
///
/// Returns `None` when there are fewer than two distinct dates.
pub fn infer_interval(dates: &[NaiveDate]) -> Option<Interval> {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    sorted
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .min()
        .map(Interval::from_spacing_days)
}

/// First and last index dates, or `None` for a dataset without a date index.
pub fn time_range(dataset: &Dataset) -> Option<TimeRange> {
    let dates = dataset.index().dates()?;
    Some(TimeRange {
        start: *dates.first()?,
        end: *dates.last()?,
    })
}

/// Frequency label of the date index ("Monthly", ...), or "N/A" when the
/// index is not date-typed or too short to tell.
pub fn temporal_interval(dataset: &Dataset) -> String {
    dataset
        .index()
        .dates()
        .and_then(infer_interval)
        .map_or_else(|| NOT_AVAILABLE.to_string(), |i| i.label().to_string())
}
