//! # Pricing Engine
//!
//! Maps a [`JobConfig`] and a [`Catalog`] to a [`CostBreakdown`].
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      compute_quote(config, catalog)                     │
//! │                                                                         │
//! │  1. Paper     sheet kg = 0.06237 × grammage / 1000                      │
//! │               paper    = sheet kg × cost/kg × quantity                  │
//! │  2. Setup     press setup (min) / 60 × press hourly cost                │
//! │  3. Printing  quantity / cadence × hourly cost × print-type multiplier  │
//! │  4. Finishes  Σ unit cost × quantity                                    │
//! │               setup += finish setup (min) / 60 × finishing hourly cost  │
//! │  5. Labor     10% × (paper + printing + finishes)                       │
//! │  6. Total     paper + setup + printing + finishes + labor               │
//! │  7. Margin    HT = total × (1 + margin / 100)                           │
//! │  8. Express   HT × 1.2                                                  │
//! │  9. VAT       TVA = HT × 0.20, TTC = HT + TVA                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reproducibility
//! Saved quotes only keep `price_ht`; re-pricing the stored configuration
//! against the same catalog must give back the exact same `f64`. The
//! operations below therefore run in a fixed order with no intermediate
//! rounding. Rounding to cents happens only for display ([`crate::money`]).
//!
//! Missing references (unknown paper or finish id, no press) contribute
//! zero. [`price_job`] reports them as warnings without changing the numbers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::types::{JobConfig, MachineType};

// =============================================================================
// Constants
// =============================================================================

/// Area of one sheet in m², whatever the selected format.
pub const SHEET_AREA_M2: f64 = 0.06237;

/// Hourly rate used for finish setup when no finishing machine exists,
/// or when the first one is rated at zero.
pub const DEFAULT_FINISHING_HOURLY_COST: f64 = 25.0;

/// Labor surcharge on production costs (paper + printing + finishes).
pub const LABOR_RATE: f64 = 0.10;

/// Express surcharge multiplier.
pub const EXPRESS_MULTIPLIER: f64 = 1.2;

/// VAT rate.
pub const VAT_RATE: f64 = 0.20;

// =============================================================================
// Cost Breakdown
// =============================================================================

/// Result of pricing a job. All amounts in euros, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CostBreakdown {
    pub paper_cost: f64,
    pub setup_cost: f64,
    pub printing_cost: f64,
    pub finishes_cost: f64,
    pub labor_cost: f64,
    pub total_cost: f64,

    #[serde(rename = "priceHT")]
    pub price_ht: f64,

    pub tva: f64,

    #[serde(rename = "priceTTC")]
    pub price_ttc: f64,
}

impl CostBreakdown {
    /// Amount shown on the margin line: everything between cost and price.
    ///
    /// Includes the express surcharge when the job is express.
    pub fn margin_amount(&self) -> f64 {
        self.price_ht - self.total_cost
    }

    /// Amount shown on the express line, `None` for standard jobs.
    pub fn express_surcharge(&self, express: bool) -> Option<f64> {
        express.then(|| self.price_ht / EXPRESS_MULTIPLIER * 0.2)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Prices a job against a catalog.
///
/// Pure and deterministic: same inputs, bit-identical output. Never fails.
///
/// ## Example
/// ```rust
/// use devis_core::pricing::compute_quote;
/// use devis_core::{Catalog, JobConfig};
///
/// // Nothing to price against: everything is zero
/// let breakdown = compute_quote(&JobConfig::default(), &Catalog::default());
/// assert_eq!(breakdown.price_ht, 0.0);
/// ```
pub fn compute_quote(config: &JobConfig, catalog: &Catalog) -> CostBreakdown {
    let quantity = config.quantity as f64;

    let mut paper_cost = 0.0;
    let mut setup_cost = 0.0;
    let mut printing_cost = 0.0;
    let mut finishes_cost = 0.0;

    // 1. Paper
    if config.quantity > 0 {
        if let Some(paper) = config.paper_id.as_deref().and_then(|id| catalog.paper(id)) {
            let weight_per_sheet_kg = SHEET_AREA_M2 * paper.grammage / 1000.0;
            paper_cost = weight_per_sheet_kg * paper.cost_per_kg * quantity;
        }
    }

    // 2-3. Press setup and run
    if let Some(press) = catalog.first_machine(MachineType::Impression) {
        setup_cost = (press.setup_time / 60.0) * press.hourly_cost;

        if config.quantity > 0 {
            let printing_hours = quantity / press.cadence;
            printing_cost = printing_hours * press.hourly_cost;
            printing_cost *= config.print_type.printing_multiplier();
        }
    }

    // 4. Finishes
    let finishing_hourly_cost = catalog
        .first_machine(MachineType::Finition)
        .map(|m| m.hourly_cost)
        .filter(|cost| *cost != 0.0)
        .unwrap_or(DEFAULT_FINISHING_HOURLY_COST);

    for finish in config
        .unique_finish_ids()
        .into_iter()
        .filter_map(|id| catalog.finish(id))
    {
        finishes_cost += finish.unit_cost * quantity;
        setup_cost += (finish.setup_time / 60.0) * finishing_hourly_cost;
    }

    // 5. Labor
    let labor_cost = (paper_cost + printing_cost + finishes_cost) * LABOR_RATE;

    // 6. Total, summed in breakdown order
    let total_cost = paper_cost + setup_cost + printing_cost + finishes_cost + labor_cost;

    // 7-8. Margin and express
    let mut price_ht = total_cost * (1.0 + config.margin / 100.0);
    if config.express {
        price_ht *= EXPRESS_MULTIPLIER;
    }

    // 9. VAT
    let tva = price_ht * VAT_RATE;
    let price_ttc = price_ht + tva;

    CostBreakdown {
        paper_cost,
        setup_cost,
        printing_cost,
        finishes_cost,
        labor_cost,
        total_cost,
        price_ht,
        tva,
        price_ttc,
    }
}

// =============================================================================
// Warnings
// =============================================================================

/// Something in the job the catalog could not resolve or does not expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum PricingWarning {
    /// The selected paper id matches no paper. Paper is priced at zero.
    UnknownPaper { id: String },
    /// A selected finish id matches no finish. It is skipped.
    UnknownFinish { id: String },
    /// No printing machine in the catalog. Setup and printing are zero.
    NoPrintingMachine,
    /// The margin falls outside the bounds recorded for the product.
    /// The margin is applied as entered.
    #[serde(rename_all = "camelCase")]
    MarginOutsideRule {
        product: String,
        margin: f64,
        min_margin: f64,
        max_margin: f64,
    },
}

impl std::fmt::Display for PricingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingWarning::UnknownPaper { id } => write!(f, "Unknown paper: {}", id),
            PricingWarning::UnknownFinish { id } => write!(f, "Unknown finish: {}", id),
            PricingWarning::NoPrintingMachine => write!(f, "No printing machine in catalog"),
            PricingWarning::MarginOutsideRule {
                product,
                margin,
                min_margin,
                max_margin,
            } => write!(
                f,
                "Margin {}% outside {}-{}% for {}",
                margin, min_margin, max_margin, product
            ),
        }
    }
}

/// A breakdown plus what could not be resolved while computing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedJob {
    pub breakdown: CostBreakdown,
    pub warnings: Vec<PricingWarning>,
}

/// Same numbers as [`compute_quote`], with unresolved references and
/// out-of-rule margins listed.
pub fn price_job(config: &JobConfig, catalog: &Catalog) -> PricedJob {
    let mut warnings = Vec::new();

    if let Some(id) = config.paper_id.as_deref() {
        if catalog.paper(id).is_none() {
            warnings.push(PricingWarning::UnknownPaper { id: id.to_string() });
        }
    }

    for id in config.unique_finish_ids() {
        if catalog.finish(id).is_none() {
            warnings.push(PricingWarning::UnknownFinish { id: id.to_string() });
        }
    }

    if catalog.first_machine(MachineType::Impression).is_none() {
        warnings.push(PricingWarning::NoPrintingMachine);
    }

    if let Some(rule) = catalog.margin_rule_for(&config.product_type) {
        if config.margin < rule.min_margin || config.margin > rule.max_margin {
            warnings.push(PricingWarning::MarginOutsideRule {
                product: rule.product.clone(),
                margin: config.margin,
                min_margin: rule.min_margin,
                max_margin: rule.max_margin,
            });
        }
    }

    PricedJob {
        breakdown: compute_quote(config, catalog),
        warnings,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
