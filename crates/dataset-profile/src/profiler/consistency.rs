//! Cross-column consistency: aggregate columns and unit-scale outliers.

use crate::config::ProfilerConfig;
use crate::dataset::Dataset;
use crate::metadata::{Metadata, MetadataKey};
use crate::reference::ReferenceData;
use crate::utils::{median, numeric_values};
use std::collections::HashSet;
use tracing::debug;

/// How an aggregate column relates to its member columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AggregateKind {
    Sum,
    Mean,
}

impl AggregateKind {
    const ALL: [AggregateKind; 2] = [AggregateKind::Sum, AggregateKind::Mean];

    fn apply(self, values: &[f64]) -> f64 {
        let sum: f64 = values.iter().sum();
        match self {
            AggregateKind::Sum => sum,
            AggregateKind::Mean => sum / values.len() as f64,
        }
    }
}

/// What the declared unit says about the expected value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitKind {
    /// Values are shares and must lie in [0, 100].
    Percentage,
    /// Any scale; columns are compared against each other.
    Absolute,
}

impl UnitKind {
    fn from_unit(unit: &str) -> Self {
        let lower = unit.to_lowercase();
        if lower.contains('%') || lower.contains("percent") || lower.contains("prozent") {
            UnitKind::Percentage
        } else {
            UnitKind::Absolute
        }
    }
}

/// Names of columns that are the sum or mean of the entity columns whose
/// ISO3 codes are given.
///
/// Members are the numeric columns resolving to one of `iso3_codes`; every
/// other numeric column is a candidate. A candidate is compared on each row
/// where it and at least two members have values, against the sum and the
/// mean of the members present in that row. It is reported when one of the
/// two matches within `config.aggregation_tolerance` (relative) on every
/// compared row, and at least `config.min_aggregation_rows` rows were
/// compared. Fewer than two members yields an empty list.
pub fn aggregation_check<S: AsRef<str>>(
    dataset: &Dataset,
    iso3_codes: &[S],
    reference: &ReferenceData,
    config: &ProfilerConfig,
) -> Vec<String> {
    let codes: HashSet<&str> = iso3_codes.iter().map(|c| c.as_ref().trim()).collect();
    if codes.is_empty() || dataset.is_empty() {
        return Vec::new();
    }

    let mut members = Vec::new();
    let mut candidates = Vec::new();
    for column in dataset.columns() {
        let Some(values) = numeric_values(column.series()) else {
            continue;
        };
        let is_member = reference
            .iso3_for(column.name())
            .is_some_and(|code| codes.contains(code));
        if is_member {
            members.push(values);
        } else {
            candidates.push((column.name(), values));
        }
    }

    if members.len() < 2 {
        debug!(
            "Aggregation check skipped: {} member column(s) for {} code(s)",
            members.len(),
            codes.len()
        );
        return Vec::new();
    }

    candidates
        .into_iter()
        .filter_map(|(name, values)| {
            let kind = detect_aggregate(&values, &members, config)?;
            debug!("Column '{}' is the {:?} of its entity columns", name, kind);
            Some(name.to_string())
        })
        .collect()
}

fn detect_aggregate(
    candidate: &[Option<f64>],
    members: &[Vec<Option<f64>>],
    config: &ProfilerConfig,
) -> Option<AggregateKind> {
    let rows: Vec<(f64, Vec<f64>)> = candidate
        .iter()
        .enumerate()
        .filter_map(|(row, value)| {
            let value = (*value)?;
            let present: Vec<f64> = members.iter().filter_map(|m| m[row]).collect();
            (present.len() >= 2).then_some((value, present))
        })
        .collect();

    if rows.len() < config.min_aggregation_rows {
        return None;
    }

    AggregateKind::ALL.into_iter().find(|kind| {
        rows.iter().all(|(value, present)| {
            let aggregate = kind.apply(present);
            (value - aggregate).abs() <= config.aggregation_tolerance * aggregate.abs().max(1e-9)
        })
    })
}

/// Names of numeric columns whose scale does not fit the declared Unit.
///
/// Percentage units flag any value outside [0, 100]. Other units flag
/// columns whose median absolute value is more than
/// `config.unit_magnitude_threshold` orders of magnitude away from the
/// median of all column medians. Empty when Unit is not set or the dataset
/// has no cells.
pub fn unit_consistency_check(
    dataset: &Dataset,
    metadata: &Metadata,
    config: &ProfilerConfig,
) -> Vec<String> {
    let Some(unit) = metadata.text(MetadataKey::Unit) else {
        return Vec::new();
    };
    if dataset.is_empty() {
        return Vec::new();
    }

    let columns: Vec<(&str, Vec<f64>)> = dataset
        .columns()
        .filter_map(|column| {
            let values: Vec<f64> = numeric_values(column.series())?
                .into_iter()
                .flatten()
                .collect();
            (!values.is_empty()).then_some((column.name(), values))
        })
        .collect();

    let flagged: Vec<String> = match UnitKind::from_unit(unit) {
        UnitKind::Percentage => columns
            .iter()
            .filter(|(_, values)| values.iter().any(|v| !(0.0..=100.0).contains(v)))
            .map(|(name, _)| name.to_string())
            .collect(),
        UnitKind::Absolute => magnitude_outliers(&columns, config.unit_magnitude_threshold),
    };

    if !flagged.is_empty() {
        debug!("Columns inconsistent with unit '{}': {:?}", unit, flagged);
    }
    flagged
}

fn magnitude_outliers(columns: &[(&str, Vec<f64>)], threshold: f64) -> Vec<String> {
    let medians: Vec<(&str, f64)> = columns
        .iter()
        .filter_map(|(name, values)| {
            let abs: Vec<f64> = values.iter().map(|v| v.abs()).collect();
            Some((*name, median(&abs)?))
        })
        .collect();

    let all: Vec<f64> = medians.iter().map(|(_, m)| *m).collect();
    let Some(typical) = median(&all).filter(|t| *t > 0.0) else {
        return Vec::new();
    };

    medians
        .into_iter()
        .filter(|(_, m)| *m > 0.0 && (m.log10() - typical.log10()).abs() > threshold)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::CountryRecord;
    use polars::prelude::{Column, DataFrame, NamedFrom, Series};

    fn reference() -> ReferenceData {
        ReferenceData::new(
            vec![
                CountryRecord::new("Kenya", "KEN", Some("Africa")),
                CountryRecord::new("Uganda", "UGA", Some("Africa")),
                CountryRecord::new("Chad", "TCD", Some("Africa")),
                CountryRecord::new("Sierra Leone", "SLE", Some("Africa")),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    fn dataset(columns: Vec<Series>) -> Dataset {
        let columns = columns.into_iter().map(Column::from).collect();
        Dataset::from_frame(DataFrame::new(columns).unwrap())
    }

    #[test]
    fn test_sum_and_mean_aggregates() {
        let ds = dataset(vec![
            Series::new("Kenya".into(), &[Some(10.0), Some(20.0), None]),
            Series::new("Uganda".into(), &[Some(30.0), Some(40.0), Some(5.0)]),
            Series::new("Chad".into(), &[Some(20.0), Some(30.0), Some(7.0)]),
            Series::new("Total".into(), &[Some(60.0), Some(90.3), Some(12.0)]),
            Series::new("Average".into(), &[Some(20.0), Some(30.0), Some(6.0)]),
            Series::new("Other".into(), &[Some(1.0), Some(2.0), Some(3.0)]),
        ]);
        let codes = ["KEN", "TCD", "UGA"];
        let config = ProfilerConfig::default();

        assert_eq!(
            aggregation_check(&ds, &codes, &reference(), &config),
            vec!["Total", "Average"]
        );
    }

    #[test]
    fn test_aggregation_tolerance_is_relative() {
        let ds = dataset(vec![
            Series::new("Kenya".into(), &[10.0, 20.0]),
            Series::new("Uganda".into(), &[30.0, 40.0]),
            Series::new("Total".into(), &[40.0, 61.0]),
        ]);
        let codes = ["KEN", "UGA"];
        let strict = ProfilerConfig::default();
        let loose = ProfilerConfig::builder()
            .aggregation_tolerance(0.05)
            .build()
            .unwrap();

        assert!(aggregation_check(&ds, &codes, &reference(), &strict).is_empty());
        assert_eq!(
            aggregation_check(&ds, &codes, &reference(), &loose),
            vec!["Total"]
        );
    }

    #[test]
    fn test_aggregation_needs_members_and_rows() {
        let ds = dataset(vec![
            Series::new("Kenya".into(), &[Some(10.0), None]),
            Series::new("Uganda".into(), &[Some(30.0), Some(1.0)]),
            Series::new("Total".into(), &[Some(40.0), Some(1.0)]),
        ]);
        let config = ProfilerConfig::default();

        assert!(aggregation_check::<&str>(&ds, &[], &reference(), &config).is_empty());
        assert!(aggregation_check(&ds, &["KEN"], &reference(), &config).is_empty());
        // only one row has two members present
        assert!(aggregation_check(&ds, &["KEN", "UGA"], &reference(), &config).is_empty());

        let one_row = ProfilerConfig::builder()
            .min_aggregation_rows(1)
            .build()
            .unwrap();
        assert_eq!(
            aggregation_check(&ds, &["KEN", "UGA"], &reference(), &one_row),
            vec!["Total"]
        );
    }

    #[test]
    fn test_unit_magnitude_outlier() {
        let ds = dataset(vec![
            Series::new("Kenya".into(), &[Some(0.41), Some(0.43), None]),
            Series::new("Uganda".into(), &[0.38, 0.40, 0.39]),
            Series::new("Chad".into(), &[0.52, 0.55, 0.51]),
            Series::new("Sierra Leone".into(), &[2850.0, 2900.0, 3010.0]),
        ]);
        let metadata = Metadata::new().with(MetadataKey::Unit, "U.S. Dollars/Kg");

        assert_eq!(
            unit_consistency_check(&ds, &metadata, &ProfilerConfig::default()),
            vec!["Sierra Leone"]
        );
    }

    #[test]
    fn test_unit_percentage_range() {
        let ds = dataset(vec![
            Series::new("Kenya".into(), &[12.5, 14.0]),
            Series::new("Uganda".into(), &[101.0, 99.0]),
            Series::new("Chad".into(), &[-1.0, 3.0]),
            Series::new("Notes".into(), &["high", "low"]),
        ]);
        let metadata = Metadata::new().with(MetadataKey::Unit, "% of population");

        assert_eq!(
            unit_consistency_check(&ds, &metadata, &ProfilerConfig::default()),
            vec!["Uganda", "Chad"]
        );
    }

    #[test]
    fn test_unit_check_needs_unit_and_cells() {
        let ds = dataset(vec![
            Series::new("Kenya".into(), &[0.4, 0.5]),
            Series::new("Chad".into(), &[4000.0, 5000.0]),
        ]);
        let config = ProfilerConfig::default();

        assert!(unit_consistency_check(&ds, &Metadata::new(), &config).is_empty());
        let na = Metadata::new().with(MetadataKey::Unit, "N/A");
        assert!(unit_consistency_check(&ds, &na, &config).is_empty());

        let unit = Metadata::new().with(MetadataKey::Unit, "Tonnes");
        assert!(unit_consistency_check(&Dataset::empty(), &unit, &config).is_empty());
    }

    #[test]
    fn test_unit_kind() {
        assert_eq!(UnitKind::from_unit("Percent"), UnitKind::Percentage);
        assert_eq!(UnitKind::from_unit("Prozent"), UnitKind::Percentage);
        assert_eq!(UnitKind::from_unit("Tonnes"), UnitKind::Absolute);
    }
}
