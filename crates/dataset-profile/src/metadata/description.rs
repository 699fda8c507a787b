//! Parser for the per-entity Description format.
//!
//! ```text
//! description := record ("\n" record)*
//! record      := entity (";" text)?
//! ```
//!
//! The first line of a Description is usually a general sentence about the
//! dataset; it parses as a record like any other and simply never matches a
//! real entity name.

/// One line of a Description field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRecord<'a> {
    /// The entity token, trimmed.
    pub entity: &'a str,
    /// Everything after the first `;`, trimmed. Empty when the line has no `;`.
    pub text: &'a str,
}

impl DescriptionRecord<'_> {
    fn matches_exactly(&self, entity: &str) -> bool {
        self.entity.eq_ignore_ascii_case(entity)
    }

    fn matches_prefix(&self, entity: &str) -> bool {
        self.entity
            .get(..entity.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(entity))
    }
}

/// Split a Description into records, skipping blank lines.
pub fn parse_description(description: &str) -> Vec<DescriptionRecord<'_>> {
    description
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once(';') {
            Some((entity, text)) => DescriptionRecord {
                entity: entity.trim(),
                text: text.trim(),
            },
            None => DescriptionRecord {
                entity: line.trim(),
                text: "",
            },
        })
        .collect()
}

/// Find the record describing `entity`.
///
/// Matching ignores ASCII case. An exact match on the entity token wins over a
/// record whose token merely starts with `entity`; within each kind the first
/// record wins.
pub fn find_record<'r, 'a>(
    records: &'r [DescriptionRecord<'a>],
    entity: &str,
) -> Option<&'r DescriptionRecord<'a>> {
    let entity = entity.trim();
    if entity.is_empty() {
        return None;
    }
    records
        .iter()
        .find(|r| r.matches_exactly(entity))
        .or_else(|| records.iter().find(|r| r.matches_prefix(entity)))
}
