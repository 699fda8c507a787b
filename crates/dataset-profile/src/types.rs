use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel label used wherever a check has no meaningful value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Bucket a column falls into for the data-type histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Two or more distinct values, all numeric.
    #[serde(rename = "NUM")]
    Num,
    /// Two or more distinct values, at least one non-numeric.
    #[serde(rename = "STRING")]
    String,
    /// At most one distinct non-missing value.
    #[serde(rename = "CONST")]
    Const,
}

/// Column counts per [`ColumnKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeHistogram {
    #[serde(rename = "NUM")]
    pub num: usize,
    #[serde(rename = "STRING")]
    pub string: usize,
    #[serde(rename = "CONST")]
    pub constant: usize,
}

impl DataTypeHistogram {
    /// Count one more column of the given kind.
    pub fn record(&mut self, kind: ColumnKind) {
        match kind {
            ColumnKind::Num => self.num += 1,
            ColumnKind::String => self.string += 1,
            ColumnKind::Const => self.constant += 1,
        }
    }

    /// Total number of classified columns.
    pub fn total(&self) -> usize {
        self.num + self.string + self.constant
    }
}

/// First and last date of a date-indexed dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Result of matching column names against the entity reference table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMatch {
    /// Column names with no reference entry, in column order, duplicates kept.
    pub unmatched_names: Vec<String>,
    /// ISO3 codes of the matched columns, sorted and deduplicated.
    pub iso3_codes: Vec<String>,
}

/// Domain-dependent part of the quality report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainReport {
    pub unmatched_names: Vec<String>,
    pub iso3_codes: Vec<String>,
    pub regions: Vec<String>,
    pub aggregate_columns: Vec<String>,
}

/// Organization category of a dataset's publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    IntergovernmentalOrganization,
    GovernmentAgency,
    ResearchInstitution,
    NonGovernmentalOrganization,
    PrivateCompany,
    /// Publisher missing or not in the reference table.
    #[default]
    Unknown,
}

impl SourceCategory {
    /// Human-readable label; [`NOT_AVAILABLE`] for unknown publishers.
    pub fn label(self) -> &'static str {
        match self {
            SourceCategory::IntergovernmentalOrganization => "Intergovernmental Organization",
            SourceCategory::GovernmentAgency => "Government Agency",
            SourceCategory::ResearchInstitution => "Research Institution",
            SourceCategory::NonGovernmentalOrganization => "Non-Governmental Organization",
            SourceCategory::PrivateCompany => "Private Company",
            SourceCategory::Unknown => NOT_AVAILABLE,
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-column part of the quality report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub name: String,
    pub coverage_windows: Vec<String>,
    pub description: String,
}

/// Everything the profiler derives from one dataset and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// (rows, columns)
    pub shape: (usize, usize),
    pub null_percentage: Option<f64>,
    pub unique_percentage: Option<f64>,
    pub duplicated_columns: Option<Vec<String>>,
    pub data_types: DataTypeHistogram,
    pub time_range: Option<TimeRange>,
    pub temporal_interval: String,
    /// `None` when the dataset carries no entity-axis label.
    pub domain: Option<DomainReport>,
    pub unit_inconsistent_columns: Vec<String>,
    pub source_category: SourceCategory,
    pub openness_score: u8,
    pub months_since_creation: String,
    pub upload_delay: String,
    pub columns: Vec<ColumnReport>,
}
