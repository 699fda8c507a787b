//! Publisher classification and the five-star openness rating.

use crate::metadata::{Metadata, MetadataKey};
use crate::reference::{PublisherRecord, ReferenceData};
use crate::types::SourceCategory;
use tracing::debug;

/// Lowest and highest openness rating.
pub const MIN_OPENNESS_SCORE: u8 = 1;
pub const MAX_OPENNESS_SCORE: u8 = 5;

/// The publisher rule matching the metadata, if any.
///
/// Publisher is classified when present; Source stands in for it only when
/// Publisher is absent.
fn publisher_rule<'r>(metadata: &Metadata, reference: &'r ReferenceData) -> Option<&'r PublisherRecord> {
    let publisher = metadata
        .text(MetadataKey::Publisher)
        .or_else(|| metadata.text(MetadataKey::Source))?;
    let rule = reference.publisher_match(publisher);
    if rule.is_none() {
        debug!("Publisher '{}' not in reference table", publisher);
    }
    rule
}

/// Organization category of the dataset's publisher.
pub fn source_category(metadata: &Metadata, reference: &ReferenceData) -> SourceCategory {
    publisher_rule(metadata, reference)
        .map(|rule| rule.category)
        .unwrap_or_default()
}

/// Baseline stars for a publisher category.
pub fn base_score(category: SourceCategory) -> u8 {
    match category {
        SourceCategory::IntergovernmentalOrganization => 3,
        SourceCategory::GovernmentAgency => 3,
        SourceCategory::ResearchInstitution => 2,
        SourceCategory::NonGovernmentalOrganization => 2,
        SourceCategory::PrivateCompany => 1,
        SourceCategory::Unknown => 1,
    }
}

/// Five-star openness rating.
///
/// The category's [`base_score`], plus one star for a recognized
/// multilateral institution, kept within 1..=5.
pub fn openness_score(metadata: &Metadata, reference: &ReferenceData) -> u8 {
    let Some(rule) = publisher_rule(metadata, reference) else {
        return base_score(SourceCategory::Unknown);
    };
    let bonus = u8::from(rule.multilateral);
    (base_score(rule.category) + bonus).clamp(MIN_OPENNESS_SCORE, MAX_OPENNESS_SCORE)
}
