//! Static lookup tables used by domain validation and source scoring.
//!
//! Three read-only mappings:
//! - entity name (or alias, or the ISO3 code itself) -> ISO3 code
//! - ISO3 code -> region
//! - publisher pattern -> [`SourceCategory`]
//!
//! The builtin tables are embedded JSON parsed once per process by
//! [`ReferenceData::builtin`]. Tests and callers with their own entity lists
//! build a table with [`ReferenceData::new`] or [`ReferenceData::from_json`]
//! and hand it to the checks that need it.

use crate::error::{ProfilingError, Result, ResultExt};
use crate::types::SourceCategory;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

const BUILTIN_COUNTRIES: &str = include_str!("../../data/countries.json");
const BUILTIN_PUBLISHERS: &str = include_str!("../../data/publishers.json");

static BUILTIN: OnceCell<ReferenceData> = OnceCell::new();

/// One entity of the country table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub iso3: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl CountryRecord {
    /// Record without aliases.
    pub fn new(name: &str, iso3: &str, region: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            iso3: iso3.to_string(),
            region: region.map(str::to_string),
            aliases: Vec::new(),
        }
    }
}

/// One rule of the publisher table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherRecord {
    /// Name or name fragment to look for in the publisher text.
    pub pattern: String,
    pub category: SourceCategory,
    /// Recognized multilateral institution (earns the openness bonus).
    #[serde(default)]
    pub multilateral: bool,
}

impl PublisherRecord {
    pub fn new(pattern: &str, category: SourceCategory, multilateral: bool) -> Self {
        Self {
            pattern: pattern.to_string(),
            category,
            multilateral,
        }
    }
}

#[derive(Debug, Clone)]
struct PublisherRule {
    record: PublisherRecord,
    regex: Regex,
}

/// Immutable reference tables.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    entities: HashMap<String, String>,
    regions: HashMap<String, String>,
    publishers: Vec<PublisherRule>,
}

impl ReferenceData {
    /// Build tables from records.
    ///
    /// Fails when an ISO3 code is not three uppercase ASCII letters or a
    /// publisher pattern is empty.
    pub fn new(countries: Vec<CountryRecord>, publishers: Vec<PublisherRecord>) -> Result<Self> {
        let mut entities = HashMap::new();
        let mut regions = HashMap::new();

        for country in countries {
            if !is_iso3(&country.iso3) {
                return Err(ProfilingError::ReferenceData(format!(
                    "'{}' is not an ISO3 code (entity '{}')",
                    country.iso3, country.name
                )));
            }
            for name in std::iter::once(&country.name)
                .chain(&country.aliases)
                .chain(std::iter::once(&country.iso3))
            {
                entities.insert(normalize_name(name), country.iso3.clone());
            }
            if let Some(region) = country.region.filter(|r| !r.trim().is_empty()) {
                regions.insert(country.iso3, region);
            }
        }

        let publishers = publishers
            .into_iter()
            .map(|record| {
                let regex = publisher_regex(&record.pattern)?;
                Ok(PublisherRule { record, regex })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Loaded reference data: {} entity names, {} regions, {} publisher rules",
            entities.len(),
            regions.len(),
            publishers.len()
        );

        Ok(Self {
            entities,
            regions,
            publishers,
        })
    }

    /// Build tables from the JSON representation of both record lists.
    pub fn from_json(countries_json: &str, publishers_json: &str) -> Result<Self> {
        let countries: Vec<CountryRecord> = serde_json::from_str(countries_json)?;
        let publishers: Vec<PublisherRecord> = serde_json::from_str(publishers_json)?;
        Self::new(countries, publishers)
    }

    /// The builtin tables, parsed on first use and shared for the process
    /// lifetime.
    pub fn builtin() -> Result<&'static ReferenceData> {
        BUILTIN.get_or_try_init(|| {
            Self::from_json(BUILTIN_COUNTRIES, BUILTIN_PUBLISHERS)
                .context("Loading builtin reference tables")
        })
    }

    /// ISO3 code for an entity name, alias or code.
    pub fn iso3_for(&self, entity: &str) -> Option<&str> {
        self.entities
            .get(&normalize_name(entity))
            .map(String::as_str)
    }

    /// Region of an ISO3 code.
    pub fn region_for(&self, iso3: &str) -> Option<&str> {
        self.regions.get(iso3.trim()).map(String::as_str)
    }

    /// First publisher rule matching `publisher`.
    pub fn publisher_match(&self, publisher: &str) -> Option<&PublisherRecord> {
        self.publishers
            .iter()
            .find(|rule| rule.regex.is_match(publisher))
            .map(|rule| &rule.record)
    }
}

fn is_iso3(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Lowercase and collapse whitespace.
fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Pattern as a whole-word regex. Longer names ignore case. Acronyms
/// ("FAO", "WHO") ignore case only when they are the whole publisher field,
/// so that "who" inside a sentence is not read as WHO.
fn publisher_regex(pattern: &str) -> Result<Regex> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(ProfilingError::ReferenceData(
            "empty publisher pattern".to_string(),
        ));
    }
    let is_acronym = pattern
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    let escaped = regex::escape(pattern);
    let source = if is_acronym {
        format!(r"(?i:^\s*{escaped}\s*$)|(?:^|\W){escaped}(?:$|\W)")
    } else {
        format!(r"(?i)(?:^|\W){escaped}(?:$|\W)")
    };
    Regex::new(&source).map_err(|e| ProfilingError::ReferenceData(e.to_string()))
}
