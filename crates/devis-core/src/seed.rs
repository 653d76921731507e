//! # Seed Data
//!
//! The default catalog and sample quotes a fresh store is initialized with.
//!
//! Used in two places:
//! - the quote session writes it to an empty store on first load, and falls
//!   back to it when the store is unreachable
//! - the `seed` binary of devis-db writes it to a local database

use chrono::NaiveDate;

use crate::catalog::Catalog;
use crate::store::StoreData;
use crate::types::{
    Finish, JobConfig, Labor, Machine, MachineType, MarginRule, Paper, Quote, QuoteStatus,
};

fn paper(id: &str, name: &str, grammage: f64, cost_per_kg: f64, supplier: &str, notes: &str) -> Paper {
    Paper {
        id: id.to_string(),
        name: name.to_string(),
        grammage,
        cost_per_kg,
        supplier: supplier.to_string(),
        notes: notes.to_string(),
    }
}

fn finish(id: &str, name: &str, unit_cost: f64, setup_time: f64, machine: &str, notes: &str) -> Finish {
    Finish {
        id: id.to_string(),
        name: name.to_string(),
        unit_cost,
        setup_time,
        machine: machine.to_string(),
        notes: notes.to_string(),
    }
}

fn machine(
    id: &str,
    name: &str,
    machine_type: MachineType,
    hourly_cost: f64,
    cadence: f64,
    setup_time: f64,
) -> Machine {
    Machine {
        id: id.to_string(),
        name: name.to_string(),
        machine_type,
        hourly_cost,
        cadence,
        setup_time,
    }
}

fn labor(id: &str, position: &str, hourly_cost: f64, description: &str) -> Labor {
    Labor {
        id: id.to_string(),
        position: position.to_string(),
        hourly_cost,
        description: description.to_string(),
    }
}

fn margin_rule(id: &str, product: &str, min: f64, max: f64, express: f64) -> MarginRule {
    MarginRule {
        id: id.to_string(),
        product: product.to_string(),
        min_margin: min,
        max_margin: max,
        express_multiplier: express,
    }
}

fn sample_quote(
    id: &str,
    (year, month, day): (i32, u32, u32),
    client: &str,
    product: &str,
    quantity: i64,
    price_ht: f64,
    status: QuoteStatus,
) -> Option<Quote> {
    Some(Quote {
        id: id.to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day)?,
        client: client.to_string(),
        product: product.to_string(),
        quantity,
        price_ht,
        status,
        configuration: JobConfig::default(),
    })
}

/// The default reference data.
pub fn default_catalog() -> Catalog {
    Catalog {
        papers: vec![
            paper("1", "Offset 90g", 90.0, 0.85, "Antalis", "Papier standard pour flyers"),
            paper("2", "Couché brillant 135g", 135.0, 1.2, "Igepa", "Flyers et brochures haut de gamme"),
            paper("3", "Couché mat 350g", 350.0, 1.85, "Antalis", "Cartes de visite premium"),
            paper("4", "Recyclé 120g", 120.0, 0.95, "Igepa", "Option écologique"),
            paper("5", "Création 300g", 300.0, 2.1, "Arjowiggins", "Cartes de visite texturées"),
        ],
        finishes: vec![
            finish("1", "Pelliculage mat", 0.08, 15.0, "Plastifieuse", "Protection standard"),
            finish("2", "Pelliculage brillant", 0.08, 15.0, "Plastifieuse", "Finition brillante"),
            finish("3", "Vernis sélectif", 0.15, 30.0, "Sérigraphie", "Effet premium"),
            finish("4", "Dorure", 0.35, 45.0, "Machine à dorer", "Effet luxe"),
        ],
        machines: vec![
            machine("1", "Offset numérique HP", MachineType::Impression, 45.0, 5000.0, 20.0),
            machine("2", "Massicot automatique", MachineType::Finition, 25.0, 3000.0, 10.0),
        ],
        labor: vec![
            labor("1", "Opérateur impression", 22.0, "Supervision machine et contrôle qualité"),
            labor("2", "Façonneur", 18.0, "Finitions manuelles et conditionnement"),
        ],
        margin_rules: vec![
            margin_rule("1", "Cartes de visite", 30.0, 60.0, 1.2),
            margin_rule("2", "Flyer", 25.0, 50.0, 1.2),
            margin_rule("3", "Brochure", 35.0, 65.0, 1.25),
        ],
    }
}

/// Sample quotes shipped with a fresh store.
///
/// Their configurations are empty: they predate configuration snapshots,
/// so their stored price is not reproducible from the configuration.
pub fn sample_quotes() -> Vec<Quote> {
    [
        sample_quote("1", (2025, 11, 1), "Société ABC", "Cartes de visite", 500, 125.5, QuoteStatus::Accepted),
        sample_quote("2", (2025, 11, 2), "Restaurant Le Gourmet", "Flyer A5", 1000, 285.0, QuoteStatus::Sent),
        sample_quote("3", (2025, 11, 3), "Salon Beauté", "Affiche A3", 50, 95.0, QuoteStatus::Draft),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Default catalog plus sample quotes.
pub fn default_store_data() -> StoreData {
    StoreData {
        catalog: default_catalog(),
        quotes: sample_quotes(),
    }
}
