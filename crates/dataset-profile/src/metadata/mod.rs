//! Descriptive metadata attached to a dataset.
//!
//! Metadata arrives from the retrieval layer as a flat key/value mapping over
//! a fixed key set. Values are free text or numbers, any key may be missing,
//! and providers fill unknown fields with markers such as `"N/A"`. Accessors
//! on [`Metadata`] fold all of those cases into `None`.

pub mod description;

use crate::utils::is_blank_or_marker;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

pub use description::{DescriptionRecord, find_record, parse_description};

/// The fixed set of metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataKey {
    Description,
    Source,
    Publisher,
    Title,
    Id,
    Category,
    Unit,
    TemporalCoverage,
    CreationYear,
}

impl MetadataKey {
    /// All keys, in display order.
    pub const ALL: [MetadataKey; 9] = [
        MetadataKey::Description,
        MetadataKey::Source,
        MetadataKey::Publisher,
        MetadataKey::Title,
        MetadataKey::Id,
        MetadataKey::Category,
        MetadataKey::Unit,
        MetadataKey::TemporalCoverage,
        MetadataKey::CreationYear,
    ];

    /// English field name.
    pub fn name(self) -> &'static str {
        match self {
            MetadataKey::Description => "Description",
            MetadataKey::Source => "Source",
            MetadataKey::Publisher => "Publisher",
            MetadataKey::Title => "Title",
            MetadataKey::Id => "ID",
            MetadataKey::Category => "Category",
            MetadataKey::Unit => "Unit",
            MetadataKey::TemporalCoverage => "Temporal Coverage",
            MetadataKey::CreationYear => "Creation Year",
        }
    }

    /// Field name used by the German-language retrieval layer.
    pub fn german_name(self) -> &'static str {
        match self {
            MetadataKey::Description => "Beschreibung",
            MetadataKey::Source => "Quelle",
            MetadataKey::Publisher => "Herausgeber",
            MetadataKey::Title => "Titel",
            MetadataKey::Id => "ID",
            MetadataKey::Category => "Kategorie",
            MetadataKey::Unit => "Dateneinheit",
            MetadataKey::TemporalCoverage => "zeitlAbdeckung",
            MetadataKey::CreationYear => "Erstellungsdatum",
        }
    }

    /// Resolve a field name in either language, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|key| {
            key.name().eq_ignore_ascii_case(name) || key.german_name().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Number(f64),
    Text(String),
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> Self {
        MetadataValue::Number(f64::from(value))
    }
}

/// Metadata mapping over [`MetadataKey`].
///
/// Deserializes from a JSON object keyed by English or German field names;
/// `null` values and unrecognized keys are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<MetadataValue>>",
    into = "BTreeMap<String, MetadataValue>"
)]
pub struct Metadata {
    entries: BTreeMap<MetadataKey, MetadataValue>,
}

impl Metadata {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: MetadataKey, value: impl Into<MetadataValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, key: MetadataKey, value: impl Into<MetadataValue>) {
        self.entries.insert(key, value.into());
    }

    /// Remove a field.
    pub fn remove(&mut self, key: MetadataKey) -> Option<MetadataValue> {
        self.entries.remove(&key)
    }

    /// Raw value of a field.
    pub fn get(&self, key: MetadataKey) -> Option<&MetadataValue> {
        self.entries.get(&key)
    }

    /// Text of a field, or `None` if it is absent, numeric, blank or a
    /// "not available" marker.
    pub fn text(&self, key: MetadataKey) -> Option<&str> {
        match self.entries.get(&key) {
            Some(MetadataValue::Text(text)) if !is_blank_or_marker(text) => Some(text.trim()),
            _ => None,
        }
    }

    /// The dataset's creation date, read from the Creation Year field.
    ///
    /// A bare year maps to January 1st of that year; `YYYY-MM-DD` and
    /// `YYYY-MM` strings are taken as given.
    pub fn creation_date(&self) -> Option<NaiveDate> {
        match self.entries.get(&MetadataKey::CreationYear)? {
            MetadataValue::Number(year) => year_start(*year),
            MetadataValue::Text(text) => {
                let text = text.trim();
                if is_blank_or_marker(text) {
                    return None;
                }
                if let Ok(year) = text.parse::<f64>() {
                    return year_start(year);
                }
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .or_else(|_| NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d"))
                    .ok()
            }
        }
    }
}

fn year_start(year: f64) -> Option<NaiveDate> {
    if year.fract() != 0.0 || !(1.0..=9999.0).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, 1, 1)
}

impl From<BTreeMap<String, Option<MetadataValue>>> for Metadata {
    fn from(raw: BTreeMap<String, Option<MetadataValue>>) -> Self {
        let mut metadata = Metadata::new();
        for (name, value) in raw {
            match (MetadataKey::from_name(&name), value) {
                (Some(key), Some(value)) => metadata.insert(key, value),
                (Some(_), None) => {}
                (None, _) => debug!("Ignoring unrecognized metadata field '{}'", name),
            }
        }
        metadata
    }
}

impl From<Metadata> for BTreeMap<String, MetadataValue> {
    fn from(metadata: Metadata) -> Self {
        metadata
            .entries
            .into_iter()
            .map(|(key, value)| (key.name().to_string(), value))
            .collect()
    }
}
