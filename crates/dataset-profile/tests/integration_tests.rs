//! Integration tests for dataset profiling.
//!
//! These tests load CSV fixtures through polars, attach metadata and run the
//! checks and the full profiler against the builtin reference tables.

use chrono::NaiveDate;
use dataset_profile::{
    ColumnKind, DataTypeHistogram, Dataset, DatasetProfiler, Metadata, MetadataKey,
    ProfilerConfig, ProfilingError, QualityReport, ReferenceData, SourceCategory, TimeRange,
    profiler,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::{DataFrame, SerReader};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Helper Functions
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> DataFrame {
    let path = fixtures_path().join(filename);
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file")
}

fn load_dataset(filename: &str) -> Dataset {
    Dataset::from_frame_with_date_index(load_csv(filename), "date")
        .expect("Failed to build date index")
        .with_entity_axis("Country")
}

fn load_metadata(filename: &str) -> Metadata {
    let path = fixtures_path().join(filename);
    let json = std::fs::read_to_string(path).expect("Failed to read metadata file");
    serde_json::from_str(&json).expect("Failed to parse metadata")
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn profiler_at(reference_date: NaiveDate) -> DatasetProfiler<'static> {
    let config = ProfilerConfig::builder()
        .reference_date(reference_date)
        .build()
        .unwrap();
    DatasetProfiler::with_builtin_reference(config).unwrap()
}

fn food_prices_report() -> QualityReport {
    init_tracing();
    let dataset = load_dataset("food_prices.csv");
    let metadata = load_metadata("food_prices_metadata.json");
    profiler_at(ymd(2019, 8, 1))
        .profile(&dataset, &metadata)
        .expect("Profiling should succeed")
}

// ============================================================================
// Full Profile Tests
// ============================================================================

#[test]
fn test_food_prices_table_statistics() {
    let report = food_prices_report();

    assert_eq!(report.shape, (5, 8));
    // 10 of 40 cells missing: Kenya 1, Ethiopia 1, Flag 3, Atlantis 5
    assert_eq!(report.null_percentage, Some(25.0));
    // five country columns unique out of eight
    assert_eq!(report.unique_percentage, Some(62.5));
    assert_eq!(report.duplicated_columns, Some(vec!["Tanzania".to_string()]));
    assert_eq!(
        report.data_types,
        DataTypeHistogram {
            num: 5,
            string: 1,
            constant: 2
        }
    );
}

#[test]
fn test_food_prices_time_axis() {
    let report = food_prices_report();

    assert_eq!(
        report.time_range,
        Some(TimeRange {
            start: ymd(2019, 1, 1),
            end: ymd(2019, 6, 1)
        })
    );
    assert_eq!(report.temporal_interval, "Monthly");
}

#[test]
fn test_food_prices_domain() {
    let report = food_prices_report();
    let domain = report.domain.expect("Dataset carries an entity axis");

    assert_eq!(domain.unmatched_names, vec!["Notes", "Flag", "Atlantis"]);
    assert_eq!(domain.iso3_codes, vec!["ETH", "KEN", "SLE", "TZA", "UGA"]);
    assert_eq!(domain.regions, vec!["Africa"]);
    assert!(domain.aggregate_columns.is_empty());
}

#[test]
fn test_food_prices_unit_outlier() {
    let report = food_prices_report();
    assert_eq!(report.unit_inconsistent_columns, vec!["Sierra Leone"]);
}

#[test]
fn test_food_prices_metadata_scores() {
    let report = food_prices_report();

    assert_eq!(
        report.source_category,
        SourceCategory::IntergovernmentalOrganization
    );
    assert_eq!(report.openness_score, 3);
    assert_eq!(report.months_since_creation, "67");
    assert_eq!(report.upload_delay, "+65");
}

#[test]
fn test_food_prices_column_reports() {
    let report = food_prices_report();
    let column = |name: &str| {
        report
            .columns
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("missing column report for {name}"))
    };

    // a missing value in April and the unreported March both break runs
    assert_eq!(
        column("Kenya").coverage_windows,
        vec!["2019-01-01 - 2019-02-01", "2019-05-01 - 2019-06-01"]
    );
    assert_eq!(
        column("Uganda").coverage_windows,
        vec!["2019-01-01 - 2019-02-01", "2019-04-01 - 2019-06-01"]
    );
    assert_eq!(
        column("Ethiopia").coverage_windows,
        vec!["2019-01-01 - 2019-01-01", "2019-04-01 - 2019-06-01"]
    );
    assert_eq!(
        column("Flag").coverage_windows,
        vec!["2019-01-01 - 2019-01-01", "2019-05-01 - 2019-05-01"]
    );
    assert!(column("Atlantis").coverage_windows.is_empty());

    assert_eq!(column("Kenya").description, "Retail; Nairobi: Maize.");
    assert_eq!(
        column("Sierra Leone").description,
        "Retail; Freetown: Rice (imported), Leone/Kg."
    );
    assert_eq!(column("Uganda").description, "");
}

#[test]
fn test_report_serializes() {
    let report = food_prices_report();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["data_types"], serde_json::json!({"NUM": 5, "STRING": 1, "CONST": 2}));
    assert_eq!(json["source_category"], "intergovernmental_organization");
    assert_eq!(json["time_range"]["start"], "2019-01-01");

    let back: QualityReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}

// ============================================================================
// Aggregates
// ============================================================================

#[test]
fn test_regional_totals_profile() {
    init_tracing();
    let dataset = load_dataset("regional_totals.csv");
    let metadata = Metadata::new()
        .with(MetadataKey::Publisher, "World Bank")
        .with(MetadataKey::CreationYear, 2018)
        .with(MetadataKey::Unit, "Tonnes");

    let report = profiler_at(ymd(2019, 1, 1))
        .profile(&dataset, &metadata)
        .unwrap();

    assert_eq!(report.temporal_interval, "Yearly");
    assert_eq!(report.null_percentage, Some(6.67));
    assert_eq!(report.unique_percentage, Some(100.0));
    assert_eq!(report.duplicated_columns, Some(Vec::new()));

    let domain = report.domain.unwrap();
    assert_eq!(domain.unmatched_names, vec!["World", "Average"]);
    assert_eq!(domain.iso3_codes, vec!["KEN", "TCD", "UGA"]);
    assert_eq!(domain.aggregate_columns, vec!["World", "Average"]);

    assert!(report.unit_inconsistent_columns.is_empty());
    assert_eq!(report.openness_score, 4);
    assert_eq!(report.months_since_creation, "12");
    assert_eq!(report.upload_delay, "-12");
}

#[test]
fn test_aggregation_check_without_codes() {
    let dataset = load_dataset("regional_totals.csv");
    let reference = ReferenceData::builtin().unwrap();
    let config = ProfilerConfig::default();

    assert!(profiler::aggregation_check::<&str>(&dataset, &[], reference, &config).is_empty());
    assert!(profiler::aggregation_check(&dataset, &["XXX"], reference, &config).is_empty());
}

// ============================================================================
// Individual Checks
// ============================================================================

#[test]
fn test_domain_check_needs_entity_axis() {
    let dataset = Dataset::from_frame_with_date_index(load_csv("food_prices.csv"), "date").unwrap();
    let reference = ReferenceData::builtin().unwrap();

    let err = profiler::domain_check(&dataset, reference).unwrap_err();
    assert!(matches!(err, ProfilingError::MissingEntityAxis));
    assert_eq!(err.error_code(), "MISSING_ENTITY_AXIS");
}

#[test]
fn test_profile_without_entity_axis_skips_domain() {
    let dataset = Dataset::from_frame_with_date_index(load_csv("food_prices.csv"), "date").unwrap();
    let report = profiler_at(ymd(2019, 8, 1))
        .profile(&dataset, &Metadata::new())
        .unwrap();

    assert!(report.domain.is_none());
    assert_eq!(report.source_category.label(), "N/A");
    assert_eq!(report.openness_score, 1);
    assert_eq!(report.months_since_creation, "N/A");
    assert_eq!(report.upload_delay, "N/A");
}

#[test]
fn test_ordinal_index() {
    let dataset = Dataset::from_frame(load_csv("regional_totals.csv"));

    assert_eq!(profiler::time_range(&dataset), None);
    assert_eq!(profiler::temporal_interval(&dataset), "N/A");
    // the date column stays a column and is text
    let date = dataset.column("date").unwrap();
    assert_eq!(profiler::classify_column(date).unwrap(), ColumnKind::String);
    assert!(profiler::coverage_windows(date).unwrap().is_empty());
}

#[test]
fn test_empty_dataset_sentinels() {
    let dataset = Dataset::empty();
    let metadata = Metadata::new().with(MetadataKey::Unit, "Tonnes");
    let config = ProfilerConfig::default();

    assert_eq!(profiler::null_percentage(&dataset).unwrap(), None);
    assert_eq!(profiler::unique_percentage(&dataset).unwrap(), None);
    assert_eq!(profiler::duplicated_columns(&dataset).unwrap(), None);
    assert_eq!(
        profiler::data_type_histogram(&dataset).unwrap(),
        DataTypeHistogram::default()
    );
    assert!(profiler::unit_consistency_check(&dataset, &metadata, &config).is_empty());
}

#[test]
fn test_publisher_swap_changes_score() {
    let reference = ReferenceData::builtin().unwrap();
    let mut metadata = load_metadata("food_prices_metadata.json");

    assert_eq!(dataset_profile::scoring::openness_score(&metadata, reference), 3);
    metadata.insert(MetadataKey::Publisher, "World Bank");
    assert_eq!(dataset_profile::scoring::openness_score(&metadata, reference), 4);
}
