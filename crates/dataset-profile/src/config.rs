//! Configuration types for the dataset profiler.
//!
//! Most checks are parameter-free. The heuristic ones (aggregation detection,
//! unit consistency) and the upload-timing metrics take their tuning knobs
//! from [`ProfilerConfig`], built with the fluent [`ProfilerConfigBuilder`].

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default relative tolerance for aggregate detection (1%).
pub const DEFAULT_AGGREGATION_TOLERANCE: f64 = 0.01;

/// Default number of comparable rows an aggregate must hold on.
pub const DEFAULT_MIN_AGGREGATION_ROWS: usize = 2;

/// Default orders of magnitude a column may stray from the dataset scale.
pub const DEFAULT_UNIT_MAGNITUDE_THRESHOLD: f64 = 2.0;

/// Configuration for the dataset profiler.
///
/// # Example
///
/// ```rust,ignore
/// use dataset_profile::config::ProfilerConfig;
///
/// let config = ProfilerConfig::builder()
///     .aggregation_tolerance(0.005)
///     .unit_magnitude_threshold(1.5)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// Relative tolerance used when comparing a candidate column against the
    /// sum or mean of the entity columns (0.0 exclusive - 1.0).
    /// Default: 0.01 (1%)
    pub aggregation_tolerance: f64,

    /// Minimum number of rows on which a candidate must be comparable with
    /// the entity columns before it can be reported as an aggregate.
    /// Default: 2
    pub min_aggregation_rows: usize,

    /// Orders of magnitude a column's typical value may differ from the
    /// dataset-wide typical value before it is flagged as unit-inconsistent.
    /// Default: 2.0 (a factor of 100)
    pub unit_magnitude_threshold: f64,

    /// Date against which "months since creation" is measured.
    /// If None, today's local date is used.
    /// Default: None
    pub reference_date: Option<NaiveDate>,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            aggregation_tolerance: DEFAULT_AGGREGATION_TOLERANCE,
            min_aggregation_rows: DEFAULT_MIN_AGGREGATION_ROWS,
            unit_magnitude_threshold: DEFAULT_UNIT_MAGNITUDE_THRESHOLD,
            reference_date: None,
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// The reference date for timing metrics, falling back to today.
    pub fn effective_reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.aggregation_tolerance > 0.0 && self.aggregation_tolerance <= 1.0) {
            return Err(ConfigValidationError::InvalidTolerance(
                self.aggregation_tolerance,
            ));
        }

        if self.min_aggregation_rows == 0 {
            return Err(ConfigValidationError::InvalidMinRows(
                self.min_aggregation_rows,
            ));
        }

        if !(self.unit_magnitude_threshold.is_finite() && self.unit_magnitude_threshold > 0.0) {
            return Err(ConfigValidationError::InvalidMagnitudeThreshold(
                self.unit_magnitude_threshold,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid aggregation tolerance: {0} (must be in (0.0, 1.0])")]
    InvalidTolerance(f64),

    #[error("Invalid minimum aggregation rows: {0} (must be at least 1)")]
    InvalidMinRows(usize),

    #[error("Invalid unit magnitude threshold: {0} (must be a positive number)")]
    InvalidMagnitudeThreshold(f64),
}

impl From<ConfigValidationError> for crate::error::ProfilingError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ProfilingError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`ProfilerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProfilerConfigBuilder {
    aggregation_tolerance: Option<f64>,
    min_aggregation_rows: Option<usize>,
    unit_magnitude_threshold: Option<f64>,
    reference_date: Option<NaiveDate>,
}

impl ProfilerConfigBuilder {
    /// Set the relative tolerance for aggregate detection.
    ///
    /// # Arguments
    /// * `tolerance` - Value in (0.0, 1.0] (e.g., 0.01 = 1%)
    pub fn aggregation_tolerance(mut self, tolerance: f64) -> Self {
        self.aggregation_tolerance = Some(tolerance);
        self
    }

    /// Set how many comparable rows an aggregate must hold on.
    pub fn min_aggregation_rows(mut self, rows: usize) -> Self {
        self.min_aggregation_rows = Some(rows);
        self
    }

    /// Set the orders-of-magnitude threshold for the unit consistency check.
    pub fn unit_magnitude_threshold(mut self, orders: f64) -> Self {
        self.unit_magnitude_threshold = Some(orders);
        self
    }

    /// Pin the date used by the upload-timing metrics.
    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProfilerConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProfilerConfig, ConfigValidationError> {
        let config = ProfilerConfig {
            aggregation_tolerance: self
                .aggregation_tolerance
                .unwrap_or(DEFAULT_AGGREGATION_TOLERANCE),
            min_aggregation_rows: self
                .min_aggregation_rows
                .unwrap_or(DEFAULT_MIN_AGGREGATION_ROWS),
            unit_magnitude_threshold: self
                .unit_magnitude_threshold
                .unwrap_or(DEFAULT_UNIT_MAGNITUDE_THRESHOLD),
            reference_date: self.reference_date,
        };

        config.validate()?;
        Ok(config)
    }
}
