//! Dataset Quality Profiling Library
//!
//! Quality and openness metrics for country/time-series datasets, built on
//! Polars.
//!
//! # Overview
//!
//! A dataset here is a table with one column per entity (usually a country)
//! and one row per reporting period, plus a small metadata mapping
//! (publisher, unit, creation year, per-entity description). The library
//! derives:
//!
//! - **Column profiling**: coverage windows of each series and the
//!   Description text about each entity
//! - **Completeness**: missing cells, unique columns, duplicated columns
//! - **Type classification**: NUM / STRING / CONST histogram
//! - **Time axis**: covered range and reporting frequency
//! - **Domain validation**: ISO3 matching, regional coverage, aggregate columns
//! - **Consistency**: columns off the scale the declared unit implies
//! - **Scoring**: publisher category, five-star openness, upload timing
//!
//! All checks are pure functions over borrowed inputs and can run
//! concurrently across datasets.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dataset_profile::{Dataset, DatasetProfiler, Metadata, ProfilerConfig};
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("prices.csv".into()))?
//!     .finish()?;
//! let dataset = Dataset::from_frame_with_date_index(df, "date")?
//!     .with_entity_axis("Country");
//! let metadata: Metadata = serde_json::from_str(&metadata_json)?;
//!
//! let report = DatasetProfiler::with_builtin_reference(ProfilerConfig::default())?
//!     .profile(&dataset, &metadata)?;
//!
//! println!("Missing cells: {:?}%", report.null_percentage);
//! println!("Openness: {} stars", report.openness_score);
//! ```
//!
//! # Individual Checks
//!
//! Every check is also available on its own:
//!
//! ```rust,ignore
//! use dataset_profile::{ReferenceData, profiler};
//!
//! let reference = ReferenceData::builtin()?;
//! let matched = profiler::domain_check(&dataset, reference)?;
//! let regions = profiler::region_coverage(&matched.iso3_codes, reference);
//! ```
//!
//! # Reference Data
//!
//! Country, region and publisher tables ship with the crate and are loaded
//! once per process. Tests and callers with their own entity lists can build
//! a [`ReferenceData`] from records or JSON instead.

pub mod config;
pub mod dataset;
pub mod error;
pub mod metadata;
pub mod profiler;
pub mod reference;
pub mod scoring;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, ProfilerConfig, ProfilerConfigBuilder};
pub use dataset::{ColumnView, Dataset, RowIndex};
pub use error::{ProfilingError, Result as ProfilingResult, ResultExt};
pub use metadata::{DescriptionRecord, Metadata, MetadataKey, MetadataValue, parse_description};
pub use profiler::{DatasetProfiler, Interval};
pub use reference::{CountryRecord, PublisherRecord, ReferenceData};
pub use types::{
    ColumnKind, ColumnReport, DataTypeHistogram, DomainMatch, DomainReport, NOT_AVAILABLE,
    QualityReport, SourceCategory, TimeRange,
};

static_assertions::assert_impl_all!(Dataset: Send, Sync);
static_assertions::assert_impl_all!(Metadata: Send, Sync);
static_assertions::assert_impl_all!(ReferenceData: Send, Sync);
static_assertions::assert_impl_all!(DatasetProfiler<'static>: Send, Sync);
