//! # Validation Module
//!
//! Input validation for quotes and catalog edits.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web form                                                     │
//! │  ├── Slider bounds, preset quantities                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quote save: client name, product name, finite price               │
//! │  └── Catalog edit: ids, names, positive rates                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── Typed deserialization of each section                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation runs before anything is computed or saved. A failing check
//! leaves every collection untouched.
//!
//! ## Usage
//! ```rust
//! use devis_core::validation::validate_client_name;
//!
//! assert_eq!(validate_client_name("  Société ABC ").unwrap(), "Société ABC");
//! assert!(validate_client_name("   ").is_err());
//! ```

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::error::ValidationError;
use crate::types::JobConfig;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted client name.
pub const MAX_CLIENT_NAME_LEN: usize = 200;

// =============================================================================
// Quote Validators
// =============================================================================

/// Validates a client name.
///
/// ## Returns
/// The trimmed name.
pub fn validate_client_name(client: &str) -> ValidationResult<String> {
    let client = client.trim();

    if client.is_empty() {
        return Err(ValidationError::required("client"));
    }

    if client.chars().count() > MAX_CLIENT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "client".to_string(),
            max: MAX_CLIENT_NAME_LEN,
        });
    }

    Ok(client.to_string())
}

/// Resolves the product name of a job, failing when it is blank.
///
/// "Autre" takes its name from the custom product field.
pub fn resolve_product_name(config: &JobConfig) -> ValidationResult<String> {
    config
        .product_name()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::required("product"))
}

/// Validates a price before it is stored on a quote.
///
/// JSON has no representation for infinities, so a non-finite price could
/// not be saved.
pub fn validate_price(price_ht: f64) -> ValidationResult<f64> {
    if !price_ht.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "priceHT".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    Ok(price_ht)
}

// =============================================================================
// Catalog Validators
// =============================================================================

fn require_text(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

fn require_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn require_unique_ids<'a>(
    field: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> ValidationResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        require_text(field, id)?;
        if !seen.insert(id) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Validates every record of a catalog.
///
/// ## Rules
/// - ids are present and unique within their collection
/// - names are present
/// - grammage and cadence are positive
/// - costs, rates and setup times are not negative
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult<()> {
    require_unique_ids("paper.id", catalog.papers.iter().map(|p| p.id.as_str()))?;
    for paper in &catalog.papers {
        require_text("paper.name", &paper.name)?;
        require_positive("paper.grammage", paper.grammage)?;
        require_non_negative("paper.costPerKg", paper.cost_per_kg)?;
    }

    require_unique_ids("finish.id", catalog.finishes.iter().map(|f| f.id.as_str()))?;
    for finish in &catalog.finishes {
        require_text("finish.name", &finish.name)?;
        require_non_negative("finish.unitCost", finish.unit_cost)?;
        require_non_negative("finish.setupTime", finish.setup_time)?;
    }

    require_unique_ids("machine.id", catalog.machines.iter().map(|m| m.id.as_str()))?;
    for machine in &catalog.machines {
        require_text("machine.name", &machine.name)?;
        require_non_negative("machine.hourlyCost", machine.hourly_cost)?;
        require_positive("machine.cadence", machine.cadence)?;
        require_non_negative("machine.setupTime", machine.setup_time)?;
    }

    require_unique_ids("labor.id", catalog.labor.iter().map(|l| l.id.as_str()))?;
    for labor in &catalog.labor {
        require_text("labor.position", &labor.position)?;
        require_non_negative("labor.hourlyCost", labor.hourly_cost)?;
    }

    require_unique_ids(
        "marginRule.id",
        catalog.margin_rules.iter().map(|r| r.id.as_str()),
    )?;
    for rule in &catalog.margin_rules {
        require_text("marginRule.product", &rule.product)?;
        require_non_negative("marginRule.minMargin", rule.min_margin)?;
        require_non_negative("marginRule.maxMargin", rule.max_margin)?;
        require_positive("marginRule.expressMultiplier", rule.express_multiplier)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
