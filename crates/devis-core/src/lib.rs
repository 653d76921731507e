//! # devis-core: Pure Quoting Logic for Devis Imprimeur
//!
//! This crate holds the business rules of the print shop quoting tool:
//! what a job costs, how quotes move through their lifecycle, and what is
//! printed on a quote document. Nothing here touches a database or a socket.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Devis Imprimeur Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web frontend                                 │   │
//! │  │    Quote form ──► Quote list ──► Admin tables ──► PDF export    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                devis-sync (QuoteSession)                        │   │
//! │  │    load with fallback, per-section saves, notifications         │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │ HTTP                   │
//! │  ┌──────────────▼──────────────────────┐  ┌────▼──────────────────┐   │
//! │  │     ★ devis-core (THIS CRATE) ★     │  │  store-server (axum)  │   │
//! │  │                                     │  │          │            │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────┐ │  │  ┌───────▼────────┐   │   │
//! │  │  │ pricing │ │  quote  │ │  doc  │ │  │  │ devis-db (KV)  │   │   │
//! │  │  └─────────┘ └─────────┘ └───────┘ │  │  └────────────────┘   │   │
//! │  │  NO I/O • NO DATABASE • NO NETWORK  │  └───────────────────────┘   │
//! │  └─────────────────────────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records: Paper, Finish, Machine, JobConfig, Quote, ...
//! - [`catalog`] - Reference data lookups
//! - [`pricing`] - The cost engine
//! - [`quote`] - Quote lifecycle
//! - [`store`] - Sections of the key-value store and partial updates
//! - [`document`] - Fields of the printable quote
//! - [`money`] - Display rounding of amounts
//! - [`validation`] - Input checks
//! - [`seed`] - Default catalog and sample quotes
//! - [`wire`] - JSON bodies of the store service
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use devis_core::{compute_quote, seed, JobConfig, Money};
//!
//! let catalog = seed::default_catalog();
//! let config = JobConfig {
//!     product_type: "Flyer".to_string(),
//!     paper_id: Some("1".to_string()),
//!     quantity: 500,
//!     margin: 40.0,
//!     ..Default::default()
//! };
//!
//! let breakdown = compute_quote(&config, &catalog);
//! assert_eq!(Money::from_amount(breakdown.price_ht).to_string(), "31.60 €");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod document;
pub mod error;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod seed;
pub mod store;
pub mod types;
pub mod validation;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Catalog;
pub use document::{PriceRow, QuoteDocument};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{compute_quote, price_job, CostBreakdown, PricedJob, PricingWarning};
pub use quote::QuoteBook;
pub use store::{Section, SectionPayload, StoreChanges, StoreData};
pub use types::*;
