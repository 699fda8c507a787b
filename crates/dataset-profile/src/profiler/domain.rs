//! Entity-domain validation: column names against the reference tables.

use crate::dataset::Dataset;
use crate::error::{ProfilingError, Result};
use crate::reference::ReferenceData;
use crate::types::{DomainMatch, NOT_AVAILABLE};
use std::collections::BTreeSet;
use tracing::debug;

/// Match every column name against the entity table.
///
/// The dataset must carry an entity-axis label; without one this fails with
/// [`ProfilingError::MissingEntityAxis`]. Unmatched names come back in column
/// order with duplicates kept, matched names contribute their ISO3 code to a
/// sorted, deduplicated list.
pub fn domain_check(dataset: &Dataset, reference: &ReferenceData) -> Result<DomainMatch> {
    let axis = dataset
        .entity_axis()
        .filter(|label| !label.trim().is_empty())
        .ok_or(ProfilingError::MissingEntityAxis)?;

    let mut unmatched_names = Vec::new();
    let mut codes = BTreeSet::new();

    for name in dataset.column_names() {
        match reference.iso3_for(name) {
            Some(code) => {
                codes.insert(code.to_string());
            }
            None => unmatched_names.push(name.to_string()),
        }
    }

    debug!(
        "Domain check on '{}' axis: {} matched codes, {} unmatched names",
        axis,
        codes.len(),
        unmatched_names.len()
    );

    Ok(DomainMatch {
        unmatched_names,
        iso3_codes: codes.into_iter().collect(),
    })
}

/// Distinct regions of the given ISO3 codes, sorted.
///
/// Returns `["N/A"]` when no code resolves to a region.
pub fn region_coverage<S: AsRef<str>>(iso3_codes: &[S], reference: &ReferenceData) -> Vec<String> {
    let regions: BTreeSet<&str> = iso3_codes
        .iter()
        .filter_map(|code| reference.region_for(code.as_ref()))
        .collect();

    if regions.is_empty() {
        return vec![NOT_AVAILABLE.to_string()];
    }
    regions.into_iter().map(str::to_string).collect()
}
