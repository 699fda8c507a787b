//! Data profiling module for country/time-series datasets.
//!
//! This module provides the individual quality checks:
//! - Column level: coverage windows and per-entity description text
//! - Completeness: missing cells, unique columns, duplicated columns
//! - Type classification into NUM / STRING / CONST
//! - Time axis: covered range and reporting frequency
//! - Entity domain: ISO3 matching, regions, aggregate columns
//! - Unit consistency
//!
//! Each check is a free function over borrowed inputs. [`DatasetProfiler`]
//! runs all of them, plus the metadata scores from [`crate::scoring`], and
//! collects the results into a [`QualityReport`].

mod column;
mod completeness;
mod consistency;
mod domain;
mod temporal;
mod type_inference;

use crate::config::ProfilerConfig;
use crate::dataset::{ColumnView, Dataset};
use crate::error::{ProfilingError, Result, ResultExt};
use crate::metadata::Metadata;
use crate::reference::ReferenceData;
use crate::scoring;
use crate::types::{ColumnReport, DomainReport, QualityReport};
use tracing::{debug, info, warn};

pub use column::{coverage_windows, extract_entity_description};
pub use completeness::{duplicated_columns, null_percentage, unique_percentage};
pub use consistency::{aggregation_check, unit_consistency_check};
pub use domain::{domain_check, region_coverage};
pub use temporal::{Interval, infer_interval, months_between, temporal_interval, time_range};
pub use type_inference::{classify_column, data_type_histogram};

/// Runs every check against one dataset and its metadata.
///
/// # Example
///
/// ```rust,ignore
/// use dataset_profile::{Dataset, DatasetProfiler, Metadata, ProfilerConfig};
///
/// let profiler = DatasetProfiler::with_builtin_reference(ProfilerConfig::default())?;
/// let dataset = Dataset::from_frame_with_date_index(df, "date")?.with_entity_axis("Country");
/// let report = profiler.profile(&dataset, &metadata)?;
/// println!("{}", serde_json::to_string_pretty(&report)?);
/// ```
#[derive(Debug, Clone)]
pub struct DatasetProfiler<'r> {
    config: ProfilerConfig,
    reference: &'r ReferenceData,
}

impl<'r> DatasetProfiler<'r> {
    /// Create a profiler over the given reference tables.
    pub fn new(config: ProfilerConfig, reference: &'r ReferenceData) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, reference })
    }

    /// The active configuration.
    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// The reference tables in use.
    pub fn reference(&self) -> &'r ReferenceData {
        self.reference
    }

    /// Profile an entire dataset.
    ///
    /// Degenerate inputs (no cells, no date index, no metadata) are reported
    /// through sentinel values; only failures while reading the frame are
    /// returned as errors. A dataset without an entity axis is profiled
    /// without its domain section.
    pub fn profile(&self, dataset: &Dataset, metadata: &Metadata) -> Result<QualityReport> {
        info!(
            "Profiling dataset: {} rows x {} columns",
            dataset.height(),
            dataset.width()
        );
        if dataset.is_empty() {
            warn!("Dataset has no cells; table statistics will be unavailable");
        }

        let null_percentage = null_percentage(dataset).context("Computing null percentage")?;
        let unique_percentage =
            unique_percentage(dataset).context("Computing unique percentage")?;
        let duplicated_columns =
            duplicated_columns(dataset).context("Detecting duplicated columns")?;
        let data_types = data_type_histogram(dataset).context("Classifying columns")?;
        debug!(
            "Completeness: nulls={:?}%, unique={:?}%, duplicated={:?}",
            null_percentage, unique_percentage, duplicated_columns
        );

        let time_range = time_range(dataset);
        let temporal_interval = temporal_interval(dataset);
        let domain = self.domain_report(dataset)?;
        let unit_inconsistent_columns = unit_consistency_check(dataset, metadata, &self.config);

        let source_category = scoring::source_category(metadata, self.reference);
        let openness_score = scoring::openness_score(metadata, self.reference);
        let months_since_creation =
            scoring::months_since_creation(metadata, self.config.effective_reference_date());
        let upload_delay = scoring::upload_delay(dataset, metadata);

        let columns = dataset
            .columns()
            .map(|column| Self::column_report(column, metadata))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Profiling complete: {} columns, source '{}', openness {}/{}",
            columns.len(),
            source_category,
            openness_score,
            scoring::MAX_OPENNESS_SCORE
        );

        Ok(QualityReport {
            shape: (dataset.height(), dataset.width()),
            null_percentage,
            unique_percentage,
            duplicated_columns,
            data_types,
            time_range,
            temporal_interval,
            domain,
            unit_inconsistent_columns,
            source_category,
            openness_score,
            months_since_creation,
            upload_delay,
            columns,
        })
    }

    fn domain_report(&self, dataset: &Dataset) -> Result<Option<DomainReport>> {
        let matched = match domain_check(dataset, self.reference) {
            Ok(matched) => matched,
            Err(ProfilingError::MissingEntityAxis) => {
                warn!("Dataset has no entity axis label; skipping domain validation");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let regions = region_coverage(&matched.iso3_codes, self.reference);
        let aggregate_columns =
            aggregation_check(dataset, &matched.iso3_codes, self.reference, &self.config);

        Ok(Some(DomainReport {
            unmatched_names: matched.unmatched_names,
            iso3_codes: matched.iso3_codes,
            regions,
            aggregate_columns,
        }))
    }

    fn column_report(column: ColumnView<'_>, metadata: &Metadata) -> Result<ColumnReport> {
        let coverage_windows = coverage_windows(column)
            .context(format!("Computing coverage for column '{}'", column.name()))?;
        Ok(ColumnReport {
            name: column.name().to_string(),
            coverage_windows,
            description: extract_entity_description(column.name(), metadata),
        })
    }
}

impl DatasetProfiler<'static> {
    /// Create a profiler over the builtin reference tables.
    pub fn with_builtin_reference(config: ProfilerConfig) -> Result<Self> {
        Self::new(config, ReferenceData::builtin()?)
    }
}
