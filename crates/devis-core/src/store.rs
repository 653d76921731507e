//! # Store Model
//!
//! Shape of the data held by the key-value store: six independent sections,
//! each saved wholesale under its own key.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Section        Path segment    Store key          Body on PUT          │
//! │  ─────────────  ──────────────  ─────────────────  ──────────────────   │
//! │  Papers         papers          app:papers         {"papers": [...]}    │
//! │  Finishes       finishes        app:finishes       {"finishes": [...]}  │
//! │  Machines       machines        app:machines       {"machines": [...]}  │
//! │  Labor          labor           app:labor          {"labor": [...]}     │
//! │  MarginRules    marginRules     app:marginRules    {"marginRules": ...} │
//! │  Quotes         quotes          app:quotes         {"quotes": [...]}    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no transaction across sections. A partial update saves the
//! changed sections one by one in the order above.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::types::{Finish, Labor, Machine, MarginRule, Paper, Quote};

// =============================================================================
// Section
// =============================================================================

/// One of the six stored collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Papers,
    Finishes,
    Machines,
    Labor,
    MarginRules,
    Quotes,
}

impl Section {
    /// All sections, in save order.
    pub const ALL: [Section; 6] = [
        Section::Papers,
        Section::Finishes,
        Section::Machines,
        Section::Labor,
        Section::MarginRules,
        Section::Quotes,
    ];

    /// Name used as URL path segment and as JSON field.
    pub fn name(&self) -> &'static str {
        match self {
            Section::Papers => "papers",
            Section::Finishes => "finishes",
            Section::Machines => "machines",
            Section::Labor => "labor",
            Section::MarginRules => "marginRules",
            Section::Quotes => "quotes",
        }
    }

    /// Key under which the section is stored.
    pub fn store_key(&self) -> &'static str {
        match self {
            Section::Papers => "app:papers",
            Section::Finishes => "app:finishes",
            Section::Machines => "app:machines",
            Section::Labor => "app:labor",
            Section::MarginRules => "app:marginRules",
            Section::Quotes => "app:quotes",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.name() == s)
            .ok_or_else(|| CoreError::UnknownSection(s.to_string()))
    }
}

// =============================================================================
// Section Payload
// =============================================================================

/// The full contents of one section, typed.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionPayload {
    Papers(Vec<Paper>),
    Finishes(Vec<Finish>),
    Machines(Vec<Machine>),
    Labor(Vec<Labor>),
    MarginRules(Vec<MarginRule>),
    Quotes(Vec<Quote>),
}

impl SectionPayload {
    /// Returns the section this payload replaces.
    pub fn section(&self) -> Section {
        match self {
            SectionPayload::Papers(_) => Section::Papers,
            SectionPayload::Finishes(_) => Section::Finishes,
            SectionPayload::Machines(_) => Section::Machines,
            SectionPayload::Labor(_) => Section::Labor,
            SectionPayload::MarginRules(_) => Section::MarginRules,
            SectionPayload::Quotes(_) => Section::Quotes,
        }
    }

    /// Number of records in the payload.
    pub fn len(&self) -> usize {
        match self {
            SectionPayload::Papers(items) => items.len(),
            SectionPayload::Finishes(items) => items.len(),
            SectionPayload::Machines(items) => items.len(),
            SectionPayload::Labor(items) => items.len(),
            SectionPayload::MarginRules(items) => items.len(),
            SectionPayload::Quotes(items) => items.len(),
        }
    }

    /// True when the payload holds no record.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses the stored JSON array of a section.
    pub fn from_json(section: Section, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match section {
            Section::Papers => SectionPayload::Papers(serde_json::from_value(value)?),
            Section::Finishes => SectionPayload::Finishes(serde_json::from_value(value)?),
            Section::Machines => SectionPayload::Machines(serde_json::from_value(value)?),
            Section::Labor => SectionPayload::Labor(serde_json::from_value(value)?),
            Section::MarginRules => SectionPayload::MarginRules(serde_json::from_value(value)?),
            Section::Quotes => SectionPayload::Quotes(serde_json::from_value(value)?),
        })
    }

    /// Serializes the records as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            SectionPayload::Papers(items) => serde_json::to_value(items),
            SectionPayload::Finishes(items) => serde_json::to_value(items),
            SectionPayload::Machines(items) => serde_json::to_value(items),
            SectionPayload::Labor(items) => serde_json::to_value(items),
            SectionPayload::MarginRules(items) => serde_json::to_value(items),
            SectionPayload::Quotes(items) => serde_json::to_value(items),
        }
    }

    /// Builds the PUT body: `{ "<section>": [...] }`.
    pub fn to_body(&self) -> serde_json::Result<serde_json::Value> {
        let mut body = serde_json::Map::new();
        body.insert(self.section().name().to_string(), self.to_json()?);
        Ok(serde_json::Value::Object(body))
    }
}

// =============================================================================
// Store Data
// =============================================================================

/// Everything held by the store: the catalog plus the quotes.
///
/// Every section defaults to empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoreData {
    #[serde(flatten)]
    pub catalog: Catalog,

    #[serde(default)]
    pub quotes: Vec<Quote>,
}

impl StoreData {
    /// True when at least one paper is stored. An empty papers section is
    /// what marks a store as uninitialized.
    pub fn has_papers(&self) -> bool {
        !self.catalog.papers.is_empty()
    }

    /// Returns a copy of one section.
    pub fn section(&self, section: Section) -> SectionPayload {
        match section {
            Section::Papers => SectionPayload::Papers(self.catalog.papers.clone()),
            Section::Finishes => SectionPayload::Finishes(self.catalog.finishes.clone()),
            Section::Machines => SectionPayload::Machines(self.catalog.machines.clone()),
            Section::Labor => SectionPayload::Labor(self.catalog.labor.clone()),
            Section::MarginRules => SectionPayload::MarginRules(self.catalog.margin_rules.clone()),
            Section::Quotes => SectionPayload::Quotes(self.quotes.clone()),
        }
    }

    /// Replaces one section wholesale.
    pub fn apply(&mut self, payload: SectionPayload) {
        match payload {
            SectionPayload::Papers(items) => self.catalog.papers = items,
            SectionPayload::Finishes(items) => self.catalog.finishes = items,
            SectionPayload::Machines(items) => self.catalog.machines = items,
            SectionPayload::Labor(items) => self.catalog.labor = items,
            SectionPayload::MarginRules(items) => self.catalog.margin_rules = items,
            SectionPayload::Quotes(items) => self.quotes = items,
        }
    }

    /// Splits into one payload per section, in save order.
    pub fn into_sections(self) -> Vec<SectionPayload> {
        let StoreData { catalog, quotes } = self;
        vec![
            SectionPayload::Papers(catalog.papers),
            SectionPayload::Finishes(catalog.finishes),
            SectionPayload::Machines(catalog.machines),
            SectionPayload::Labor(catalog.labor),
            SectionPayload::MarginRules(catalog.margin_rules),
            SectionPayload::Quotes(quotes),
        ]
    }
}

// =============================================================================
// Store Changes
// =============================================================================

/// A partial update: only the sections that are `Some` change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub papers: Option<Vec<Paper>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finishes: Option<Vec<Finish>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machines: Option<Vec<Machine>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor: Option<Vec<Labor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_rules: Option<Vec<MarginRule>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotes: Option<Vec<Quote>>,
}

impl StoreChanges {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn papers(mut self, papers: Vec<Paper>) -> Self {
        self.papers = Some(papers);
        self
    }

    pub fn finishes(mut self, finishes: Vec<Finish>) -> Self {
        self.finishes = Some(finishes);
        self
    }

    pub fn machines(mut self, machines: Vec<Machine>) -> Self {
        self.machines = Some(machines);
        self
    }

    pub fn labor(mut self, labor: Vec<Labor>) -> Self {
        self.labor = Some(labor);
        self
    }

    pub fn margin_rules(mut self, margin_rules: Vec<MarginRule>) -> Self {
        self.margin_rules = Some(margin_rules);
        self
    }

    pub fn quotes(mut self, quotes: Vec<Quote>) -> Self {
        self.quotes = Some(quotes);
        self
    }

    /// True when no section changes.
    pub fn is_empty(&self) -> bool {
        self.papers.is_none()
            && self.finishes.is_none()
            && self.machines.is_none()
            && self.labor.is_none()
            && self.margin_rules.is_none()
            && self.quotes.is_none()
    }

    /// The changed sections, in save order.
    pub fn into_payloads(self) -> Vec<SectionPayload> {
        [
            self.papers.map(SectionPayload::Papers),
            self.finishes.map(SectionPayload::Finishes),
            self.machines.map(SectionPayload::Machines),
            self.labor.map(SectionPayload::Labor),
            self.margin_rules.map(SectionPayload::MarginRules),
            self.quotes.map(SectionPayload::Quotes),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl From<SectionPayload> for StoreChanges {
    fn from(payload: SectionPayload) -> Self {
        let changes = StoreChanges::new();
        match payload {
            SectionPayload::Papers(items) => changes.papers(items),
            SectionPayload::Finishes(items) => changes.finishes(items),
            SectionPayload::Machines(items) => changes.machines(items),
            SectionPayload::Labor(items) => changes.labor(items),
            SectionPayload::MarginRules(items) => changes.margin_rules(items),
            SectionPayload::Quotes(items) => changes.quotes(items),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use serde_json::json;

    #[test]
    fn test_section_names_and_keys() {
        assert_eq!(Section::MarginRules.name(), "marginRules");
        assert_eq!(Section::MarginRules.store_key(), "app:marginRules");
        assert_eq!("labor".parse::<Section>().unwrap(), Section::Labor);
        assert!(matches!(
            "inks".parse::<Section>(),
            Err(CoreError::UnknownSection(name)) if name == "inks"
        ));
        // Path segments are case-sensitive
        assert!("marginrules".parse::<Section>().is_err());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let data: StoreData = serde_json::from_value(json!({
            "papers": [{
                "id": "1",
                "name": "Offset 90g",
                "grammage": 90,
                "costPerKg": 0.85,
                "supplier": "Antalis",
                "notes": ""
            }]
        }))
        .unwrap();

        assert_eq!(data.catalog.papers.len(), 1);
        assert!(data.catalog.machines.is_empty());
        assert!(data.quotes.is_empty());
        assert!(data.has_papers());
    }

    #[test]
    fn test_store_data_serializes_flat() {
        let value = serde_json::to_value(seed::default_store_data()).unwrap();
        for section in Section::ALL {
            assert!(value[section.name()].is_array(), "missing {}", section);
        }
        assert!(value.get("catalog").is_none());
    }

    #[test]
    fn test_apply_replaces_section() {
        let mut data = seed::default_store_data();
        data.apply(SectionPayload::Papers(Vec::new()));
        assert!(!data.has_papers());
        assert_eq!(data.catalog.finishes.len(), 4);
    }

    #[test]
    fn test_payload_body_shape() {
        let data = seed::default_store_data();
        let body = data.section(Section::MarginRules).to_body().unwrap();
        assert_eq!(body["marginRules"].as_array().map(Vec::len), Some(3));

        let parsed =
            SectionPayload::from_json(Section::MarginRules, body["marginRules"].clone()).unwrap();
        assert_eq!(parsed, data.section(Section::MarginRules));
    }

    #[test]
    fn test_payload_rejects_wrong_shape() {
        let result = SectionPayload::from_json(Section::Papers, json!({ "id": "1" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_changes_follow_save_order() {
        let data = seed::default_store_data();
        let changes = StoreChanges::new()
            .quotes(data.quotes.clone())
            .papers(data.catalog.papers.clone());

        let sections: Vec<Section> = changes
            .into_payloads()
            .iter()
            .map(SectionPayload::section)
            .collect();
        assert_eq!(sections, vec![Section::Papers, Section::Quotes]);
    }

    #[test]
    fn test_into_sections_covers_everything() {
        let sections = seed::default_store_data().into_sections();
        assert_eq!(sections.len(), 6);
        assert_eq!(sections[5].section(), Section::Quotes);
        assert_eq!(sections[5].len(), 3);
    }
}
