//! # Catalog
//!
//! The reference data a job is priced against.
//!
//! A [`Catalog`] is a plain value: callers hand the engine the snapshot they
//! want a job priced against, and nothing inside this crate caches or shares
//! it. Lookups are linear scans in stored order; the first match wins.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Finish, Labor, Machine, MachineType, MarginRule, Paper};

/// Papers, finishes, machines, labor rates and margin rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Catalog {
    #[serde(default)]
    pub papers: Vec<Paper>,

    #[serde(default)]
    pub finishes: Vec<Finish>,

    #[serde(default)]
    pub machines: Vec<Machine>,

    #[serde(default)]
    pub labor: Vec<Labor>,

    #[serde(default)]
    pub margin_rules: Vec<MarginRule>,
}

impl Catalog {
    /// Finds a paper by id.
    pub fn paper(&self, id: &str) -> Option<&Paper> {
        self.papers.iter().find(|p| p.id == id)
    }

    /// Finds a finish by id.
    pub fn finish(&self, id: &str) -> Option<&Finish> {
        self.finishes.iter().find(|f| f.id == id)
    }

    /// Returns the first machine of the given type, in stored order.
    ///
    /// ## Example
    /// ```rust
    /// use devis_core::{Catalog, MachineType};
    ///
    /// let catalog = Catalog::default();
    /// assert!(catalog.first_machine(MachineType::Impression).is_none());
    /// ```
    pub fn first_machine(&self, machine_type: MachineType) -> Option<&Machine> {
        self.machines
            .iter()
            .find(|m| m.machine_type == machine_type)
    }

    /// Returns the margin rule recorded for a product family, if any.
    ///
    /// Margin rules never change a price. [`crate::price_job`] reports a
    /// margin outside the rule's bounds as a warning.
    pub fn margin_rule_for(&self, product: &str) -> Option<&MarginRule> {
        self.margin_rules.iter().find(|r| r.product == product)
    }
}
