//! # Domain Types
//!
//! Reference data and quote records used throughout Devis Imprimeur.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Reference data (the Catalog)                                          │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────┐ ┌─────────────┐       │
//! │  │   Paper     │ │   Finish    │ │  Machine    │ │ Labor       │       │
//! │  │  grammage   │ │  unit_cost  │ │  type       │ │ MarginRule  │       │
//! │  │  cost_per_kg│ │  setup_time │ │  cadence    │ │ (stored,    │       │
//! │  └─────────────┘ └─────────────┘ └─────────────┘ │  not priced)│       │
//! │                                                  └─────────────┘       │
//! │  Job & quote                                                           │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │   JobConfig     │───────►│     Quote       │                        │
//! │  │  paper, finishes│ snap-  │  price_ht       │                        │
//! │  │  quantity,      │ shot   │  status         │                        │
//! │  │  margin, express│        │  configuration  │                        │
//! │  └─────────────────┘        └─────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Every record serializes with the camelCase field names the web frontend
//! and the store already use (`costPerKg`, `priceHT`, `marginRules`, ...).
//! Ids are opaque strings.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Constants
// =============================================================================

/// Product type whose name comes from `custom_product`.
pub const CUSTOM_PRODUCT_TYPE: &str = "Autre";

/// Format whose name comes from `custom_format`.
pub const CUSTOM_FORMAT: &str = "Personnalisé";

// =============================================================================
// Paper
// =============================================================================

/// A paper stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Paper {
    pub id: String,
    pub name: String,

    /// Weight in g/m².
    pub grammage: f64,

    /// Price per kilogram.
    pub cost_per_kg: f64,

    #[serde(default)]
    pub supplier: String,

    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Finish
// =============================================================================

/// A finishing option (lamination, varnish, gilding...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Finish {
    pub id: String,
    pub name: String,

    /// Cost per piece.
    pub unit_cost: f64,

    /// Setup time in minutes, billed once per job.
    pub setup_time: f64,

    /// Free-text machine name. Not used to look up a [`Machine`].
    #[serde(default)]
    pub machine: String,

    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Machine
// =============================================================================

/// What a machine is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MachineType {
    /// Printing press.
    Impression,
    /// Finishing equipment (guillotine, laminator...).
    Finition,
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineType::Impression => write!(f, "impression"),
            MachineType::Finition => write!(f, "finition"),
        }
    }
}

/// A production machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Machine {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub machine_type: MachineType,

    pub hourly_cost: f64,

    /// Pieces per hour.
    pub cadence: f64,

    /// Setup time in minutes.
    pub setup_time: f64,
}

// =============================================================================
// Labor & Margin Rules
// =============================================================================

/// A labor position and its hourly rate.
///
/// Stored and edited like the rest of the catalog, but labor is priced as a
/// flat surcharge on production costs, so these rates never enter a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Labor {
    pub id: String,
    pub position: String,
    pub hourly_cost: f64,
    #[serde(default)]
    pub description: String,
}

/// Advisory margin bounds for a product family.
///
/// Not enforced: the quoted margin is used as given, and express jobs always
/// use the fixed express multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MarginRule {
    pub id: String,
    pub product: String,
    pub min_margin: f64,
    pub max_margin: f64,
    pub express_multiplier: f64,
}

// =============================================================================
// Print Type
// =============================================================================

/// Print method of a job.
///
/// Serialized as its display label. Labels outside the known three are kept
/// verbatim and price like a single-sided job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrintType {
    #[default]
    QuadriRecto,
    QuadriRectoVerso,
    Pantone,
    Other(String),
}

impl PrintType {
    /// Returns the label shown on the form and stored on the wire.
    pub fn label(&self) -> &str {
        match self {
            PrintType::QuadriRecto => "Quadri recto",
            PrintType::QuadriRectoVerso => "Quadri recto-verso",
            PrintType::Pantone => "Pantone",
            PrintType::Other(label) => label,
        }
    }

    /// Multiplier applied to the printing cost.
    pub fn printing_multiplier(&self) -> f64 {
        match self {
            PrintType::QuadriRectoVerso => 1.5,
            PrintType::Pantone => 1.3,
            PrintType::QuadriRecto | PrintType::Other(_) => 1.0,
        }
    }
}

impl From<String> for PrintType {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Quadri recto" => PrintType::QuadriRecto,
            "Quadri recto-verso" => PrintType::QuadriRectoVerso,
            "Pantone" => PrintType::Pantone,
            _ => PrintType::Other(label),
        }
    }
}

impl From<PrintType> for String {
    fn from(print_type: PrintType) -> Self {
        match print_type {
            PrintType::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for PrintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Job Configuration
// =============================================================================

/// Everything the pricing engine needs to know about a print job.
///
/// Missing fields take the quote form defaults, so the empty `{}`
/// configuration found on older quotes still parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct JobConfig {
    pub product_type: String,

    /// Product name when `product_type` is [`CUSTOM_PRODUCT_TYPE`].
    pub custom_product: String,

    pub format: String,

    /// Format name when `format` is [`CUSTOM_FORMAT`].
    pub custom_format: String,

    /// Selected paper id. Stored as `""` when no paper is selected.
    #[serde(
        rename = "paper",
        serialize_with = "serialize_paper_id",
        deserialize_with = "deserialize_paper_id"
    )]
    #[ts(as = "String")]
    pub paper_id: Option<String>,

    #[ts(as = "String")]
    pub print_type: PrintType,

    /// Selected finish ids. Treated as a set.
    #[serde(rename = "finishes")]
    pub finish_ids: Vec<String>,

    pub quantity: i64,

    /// Raw text of the custom quantity input.
    pub custom_quantity: String,

    /// Margin in percent.
    pub margin: f64,

    pub express: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            product_type: String::new(),
            custom_product: String::new(),
            format: String::new(),
            custom_format: String::new(),
            paper_id: None,
            print_type: PrintType::QuadriRecto,
            finish_ids: Vec::new(),
            quantity: 500,
            custom_quantity: String::new(),
            margin: 40.0,
            express: false,
        }
    }
}

impl JobConfig {
    /// Resolves the product name: the custom product for "Autre", the
    /// product type otherwise. `None` when the result is blank.
    pub fn product_name(&self) -> Option<&str> {
        let name = if self.product_type == CUSTOM_PRODUCT_TYPE {
            self.custom_product.trim()
        } else {
            self.product_type.trim()
        };

        (!name.is_empty()).then_some(name)
    }

    /// Resolves the format name the same way as [`JobConfig::product_name`].
    pub fn format_name(&self) -> Option<&str> {
        let name = if self.format == CUSTOM_FORMAT {
            self.custom_format.trim()
        } else {
            self.format.trim()
        };

        (!name.is_empty()).then_some(name)
    }

    /// Adds or removes a finish, keeping selection order.
    pub fn toggle_finish(&mut self, finish_id: &str) {
        if let Some(pos) = self.finish_ids.iter().position(|id| id == finish_id) {
            self.finish_ids.remove(pos);
        } else {
            self.finish_ids.push(finish_id.to_string());
        }
    }

    /// Returns the selected finish ids with duplicates removed.
    pub fn unique_finish_ids(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.finish_ids.len());
        for id in &self.finish_ids {
            if !seen.contains(&id.as_str()) {
                seen.push(id);
            }
        }
        seen
    }
}

fn serialize_paper_id<S>(paper_id: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(paper_id.as_deref().unwrap_or(""))
}

fn deserialize_paper_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|id| !id.is_empty()))
}

// =============================================================================
// Quote
// =============================================================================

/// Lifecycle status of a quote.
///
/// Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum QuoteStatus {
    #[default]
    #[serde(rename = "Brouillon")]
    Draft,
    #[serde(rename = "Envoyé")]
    Sent,
    #[serde(rename = "Accepté")]
    Accepted,
}

impl QuoteStatus {
    /// Returns the stored label.
    pub fn label(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "Brouillon",
            QuoteStatus::Sent => "Envoyé",
            QuoteStatus::Accepted => "Accepté",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QuoteStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Brouillon" => Ok(QuoteStatus::Draft),
            "Envoyé" => Ok(QuoteStatus::Sent),
            "Accepté" => Ok(QuoteStatus::Accepted),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown status '{}'", other),
            }),
        }
    }
}

/// A saved quote.
///
/// Only the final `price_ht` is stored. The cost breakdown is recomputed
/// from `configuration` whenever it is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Quote {
    pub id: String,

    /// Creation date, `YYYY-MM-DD` on the wire.
    #[ts(as = "String")]
    pub date: NaiveDate,

    pub client: String,

    /// Resolved product name at save time.
    pub product: String,

    pub quantity: i64,

    /// Price before tax.
    #[serde(rename = "priceHT")]
    pub price_ht: f64,

    pub status: QuoteStatus,

    #[serde(default)]
    pub configuration: JobConfig,
}

// =============================================================================
// Unit Tests
// =============================================================================
