//! The profiled table: entity columns over a (possibly temporal) row index.
//!
//! Polars frames have no row index, so [`Dataset`] keeps one next to the
//! frame. The index is either a plain ordinal sequence or one calendar date
//! per row; gaps between dates are allowed and stand for periods in which
//! nothing was reported. Rows are kept in ascending date order.
//!
//! The column axis may carry an entity-dimension label (e.g. `"Country"`).
//! Domain validation refuses to run without it, see
//! [`crate::profiler::domain_check`].

use crate::error::{ProfilingError, Result, ResultExt};
use crate::utils::missing_mask;
use chrono::NaiveDate;
use polars::prelude::*;
use tracing::debug;

/// Row index of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowIndex {
    /// Generic 0..n row numbering.
    #[default]
    Ordinal,
    /// One calendar date per row.
    Dates(Vec<NaiveDate>),
}

impl RowIndex {
    /// The index dates, if the index is date-typed.
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        match self {
            RowIndex::Ordinal => None,
            RowIndex::Dates(dates) => Some(dates),
        }
    }

    /// Whether the index is date-typed.
    pub fn is_temporal(&self) -> bool {
        matches!(self, RowIndex::Dates(_))
    }

    fn check_len(&self, rows: usize) -> Result<()> {
        match self {
            RowIndex::Dates(dates) if dates.len() != rows => Err(ProfilingError::InvalidIndex {
                expected: rows,
                actual: dates.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// A time-indexed table with one column per entity.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    index: RowIndex,
    entity_axis: Option<String>,
}

impl Dataset {
    /// Wrap a frame and its row index.
    ///
    /// Rows under a date index are reordered by date (stable for repeated
    /// dates). Fails if a date index does not have exactly one entry per row.
    pub fn new(frame: DataFrame, index: RowIndex) -> Result<Self> {
        index.check_len(frame.height())?;
        let (frame, index) = match index {
            RowIndex::Dates(dates) if !dates.is_sorted() => sort_by_dates(frame, dates)?,
            index => (frame, index),
        };
        Ok(Self {
            frame,
            index,
            entity_axis: None,
        })
    }

    /// Wrap a frame with an ordinal row index.
    pub fn from_frame(frame: DataFrame) -> Self {
        Self {
            frame,
            index: RowIndex::Ordinal,
            entity_axis: None,
        }
    }

    /// A dataset with no rows and no columns.
    pub fn empty() -> Self {
        Self::from_frame(DataFrame::empty())
    }

    /// Lift `column` out of the frame and use it as the date index.
    ///
    /// Accepts polars `Date`/`Datetime` columns and text in `YYYY-MM-DD`,
    /// `YYYY-MM-DD HH:MM:SS` or `YYYY-MM` form.
    pub fn from_frame_with_date_index(frame: DataFrame, column: &str) -> Result<Self> {
        let dates = {
            let index_column = frame
                .column(column)
                .map_err(|_| ProfilingError::ColumnNotFound(column.to_string()))?;
            let strings = index_column
                .as_materialized_series()
                .cast(&DataType::String)
                .context("Reading date index column")?;

            let mut dates = Vec::with_capacity(strings.len());
            for value in strings.str()?.into_iter() {
                let value =
                    value.ok_or_else(|| ProfilingError::InvalidIndexValue("null".to_string()))?;
                let date = parse_index_date(value)
                    .ok_or_else(|| ProfilingError::InvalidIndexValue(value.to_string()))?;
                dates.push(date);
            }
            dates
        };

        let frame = frame.drop(column)?;
        Self::new(frame, RowIndex::Dates(dates))
    }

    /// Attach the entity-dimension label of the column axis.
    pub fn with_entity_axis(mut self, label: impl Into<String>) -> Self {
        self.entity_axis = Some(label.into());
        self
    }

    /// The entity-dimension label, if one was attached.
    pub fn entity_axis(&self) -> Option<&str> {
        self.entity_axis.as_deref()
    }

    /// The underlying frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// The row index.
    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of entity columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// True when the dataset has no cells.
    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    /// Column names in left-to-right order.
    pub fn column_names(&self) -> Vec<&str> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| c.name().as_str())
            .collect()
    }

    /// All columns in left-to-right order.
    pub fn columns(&self) -> impl Iterator<Item = ColumnView<'_>> {
        self.frame.get_columns().iter().map(|c| ColumnView {
            series: c.as_materialized_series(),
            index: &self.index,
        })
    }

    /// Look up one column by name.
    pub fn column(&self, name: &str) -> Result<ColumnView<'_>> {
        let column = self
            .frame
            .column(name)
            .map_err(|_| ProfilingError::ColumnNotFound(name.to_string()))?;
        Ok(ColumnView {
            series: column.as_materialized_series(),
            index: &self.index,
        })
    }
}

/// One column together with the row index it is aligned to.
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    series: &'a Series,
    index: &'a RowIndex,
}

impl<'a> ColumnView<'a> {
    /// Pair a standalone series with a row index.
    pub fn new(series: &'a Series, index: &'a RowIndex) -> Result<Self> {
        index.check_len(series.len())?;
        Ok(Self { series, index })
    }

    /// Column name (the entity).
    pub fn name(&self) -> &'a str {
        self.series.name().as_str()
    }

    /// The column values.
    pub fn series(&self) -> &'a Series {
        self.series
    }

    /// The row index the values are aligned to.
    pub fn index(&self) -> &'a RowIndex {
        self.index
    }

    /// Per-row missing flags.
    pub fn missing_mask(&self) -> Result<Vec<bool>> {
        Ok(missing_mask(self.series)?)
    }
}

fn sort_by_dates(frame: DataFrame, dates: Vec<NaiveDate>) -> Result<(DataFrame, RowIndex)> {
    let mut order: Vec<IdxSize> = (0..dates.len() as IdxSize).collect();
    order.sort_by_key(|&row| dates[row as usize]);
    let sorted: Vec<NaiveDate> = order.iter().map(|&row| dates[row as usize]).collect();

    debug!("Reordering {} rows into date order", order.len());
    let frame = frame
        .take(&IdxCa::from_vec("row".into(), order))
        .context("Sorting rows by date index")?;
    Ok((frame, RowIndex::Dates(sorted)))
}

/// Parse one index label into a date.
pub(crate) fn parse_index_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Some(day) = value.get(..10)
        && let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d")
    {
        return Some(date);
    }
    if value.len() == 7 {
        return NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("date".into(), &["2012-08-01", "2012-09-01", "2012-10-01"]).into(),
            Series::new("Kenya".into(), &[Some(1.0), None, Some(3.0)]).into(),
            Series::new("India".into(), &[Some(2.0), Some(2.5), None]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_frame_with_date_index() {
        let ds = Dataset::from_frame_with_date_index(frame(), "date").unwrap();
        assert_eq!(ds.width(), 2);
        assert_eq!(ds.height(), 3);
        assert_eq!(ds.column_names(), vec!["Kenya", "India"]);
        let dates = ds.index().dates().unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2012, 8, 1).unwrap());
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2012, 10, 1).unwrap());
    }

    #[test]
    fn test_rows_sorted_by_date() {
        let df = DataFrame::new(vec![
            Series::new("date".into(), &["2019-03-01", "2019-01-01", "2019-02-01"]).into(),
            Series::new("Kenya".into(), &[Some(3.0), Some(1.0), None]).into(),
        ])
        .unwrap();
        let ds = Dataset::from_frame_with_date_index(df, "date").unwrap();

        let ymd = |m| NaiveDate::from_ymd_opt(2019, m, 1).unwrap();
        assert_eq!(ds.index().dates().unwrap(), &[ymd(1), ymd(2), ymd(3)]);
        let kenya = ds.column("Kenya").unwrap();
        assert_eq!(
            kenya.series().f64().unwrap().into_iter().collect::<Vec<_>>(),
            vec![Some(1.0), None, Some(3.0)]
        );

        assert_eq!(
            crate::profiler::time_range(&ds),
            Some(crate::types::TimeRange {
                start: ymd(1),
                end: ymd(3)
            })
        );
        let metadata =
            crate::metadata::Metadata::new().with(crate::metadata::MetadataKey::CreationYear, 2018);
        assert_eq!(crate::scoring::upload_delay(&ds, &metadata), "+14");
    }

    #[test]
    fn test_date_index_bad_value() {
        let df = DataFrame::new(vec![
            Series::new("date".into(), &["2012-08-01", "soon"]).into(),
            Series::new("Kenya".into(), &[1.0, 2.0]).into(),
        ])
        .unwrap();
        let err = Dataset::from_frame_with_date_index(df, "date").unwrap_err();
        assert!(matches!(err, ProfilingError::InvalidIndexValue(v) if v == "soon"));
    }

    #[test]
    fn test_date_index_missing_column() {
        let err = Dataset::from_frame_with_date_index(frame(), "period").unwrap_err();
        assert!(matches!(err, ProfilingError::ColumnNotFound(_)));
    }

    #[test]
    fn test_index_length_mismatch() {
        let dates = vec![NaiveDate::from_ymd_opt(2012, 8, 1).unwrap()];
        let err = Dataset::new(frame(), RowIndex::Dates(dates)).unwrap_err();
        assert!(matches!(
            err,
            ProfilingError::InvalidIndex {
                expected: 3,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_entity_axis() {
        let ds = Dataset::from_frame(frame());
        assert!(ds.entity_axis().is_none());
        let ds = ds.with_entity_axis("Country");
        assert_eq!(ds.entity_axis(), Some("Country"));
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::empty();
        assert!(ds.is_empty());
        assert_eq!(ds.columns().count(), 0);
        assert!(!ds.index().is_temporal());
    }

    #[test]
    fn test_column_lookup() {
        let ds = Dataset::from_frame(frame());
        let kenya = ds.column("Kenya").unwrap();
        assert_eq!(kenya.name(), "Kenya");
        assert_eq!(kenya.missing_mask().unwrap(), vec![false, true, false]);
        assert!(ds.column("Chad").is_err());
    }

    #[test]
    fn test_parse_index_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2015, 5, 1);
        assert_eq!(parse_index_date("2015-05-01"), expected);
        assert_eq!(parse_index_date("2015-05-01 00:00:00"), expected);
        assert_eq!(parse_index_date("2015-05"), expected);
        assert_eq!(parse_index_date("May 2015"), None);
    }
}
