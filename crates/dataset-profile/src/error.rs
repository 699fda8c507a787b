//! Error types for dataset profiling.
//!
//! Only genuine precondition violations and failures of the underlying
//! libraries surface as errors. Messy data (empty frames, all-missing
//! columns, unknown publishers) is reported through sentinel values by the
//! individual checks instead.
//!
//! Errors are serializable so they can be embedded in a JSON report next to
//! the metrics that did succeed.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the profiling library.
#[derive(Error, Debug)]
pub enum ProfilingError {
    /// Domain validation was requested on a dataset whose column axis carries
    /// no entity-dimension label.
    #[error("Dataset column axis has no entity label (e.g. \"Country\"); domain validation requires one")]
    MissingEntityAxis,

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Row index does not line up with the frame.
    #[error("Row index has {actual} entries but the dataset has {expected} rows")]
    InvalidIndex { expected: usize, actual: usize },

    /// A value in the designated index column could not be read as a date.
    #[error("Cannot interpret index value '{0}' as a calendar date")]
    InvalidIndexValue(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reference tables could not be loaded.
    #[error("Invalid reference data: {0}")]
    ReferenceData(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProfilingError>,
    },
}

impl ProfilingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProfilingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for downstream consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingEntityAxis => "MISSING_ENTITY_AXIS",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidIndex { .. } => "INVALID_INDEX",
            Self::InvalidIndexValue(_) => "INVALID_INDEX_VALUE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ReferenceData(_) => "REFERENCE_DATA",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a precondition violation raised by a check,
    /// as opposed to a failure while reading the data.
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::MissingEntityAxis | Self::ColumnNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_precondition(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProfilingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProfilingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for profiling operations.
pub type Result<T> = std::result::Result<T, ProfilingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProfilingError::Polars(e).with_context(context))
    }
}
