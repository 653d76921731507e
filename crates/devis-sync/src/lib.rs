//! # devis-sync: Store Client for Devis Imprimeur
//!
//! Keeps the working copy of the store for the quoting screens and saves
//! changes to the store service section by section.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         devis-sync                                      │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │                        QuoteSession                               │ │
//! │  │                                                                   │ │
//! │  │   load ─► fallback to seed    update ─► per-section saves         │ │
//! │  │   save_quote / set_quote_status / delete_quote / export_document  │ │
//! │  └────────────┬───────────────────────────────────┬──────────────────┘ │
//! │               │                                   │                    │
//! │  ┌────────────▼────────────┐        ┌─────────────▼────────────────┐  │
//! │  │  StoreBackend (trait)   │        │  NotificationSink (trait)    │  │
//! │  │  ├── HttpStoreClient    │        │  ├── NoOpSink                │  │
//! │  │  └── MemoryStore        │        │  └── CollectingSink          │  │
//! │  └─────────────────────────┘        └──────────────────────────────┘  │
//! │                                                                         │
//! │  ClientConfig: client.toml + DEVIS_* environment                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use devis_sync::{ClientConfig, NoOpSink, QuoteSession};
//!
//! # async fn run() -> devis_sync::SyncResult<()> {
//! let config = ClientConfig::load_or_default(None);
//! let mut session = QuoteSession::connect(&config, Arc::new(NoOpSink))?;
//!
//! let outcome = session.load().await;
//! println!("{:?}: {} quotes", outcome, session.quotes().len());
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod session;

pub use backend::{MemoryStore, StoreBackend};
pub use config::{ClientConfig, StoreSettings};
pub use error::{SyncError, SyncResult};
pub use http::HttpStoreClient;
pub use notify::{CollectingSink, NoOpSink, Notification, NotificationLevel, NotificationSink};
pub use session::{messages, LoadOutcome, QuoteSession, UpdateReport};
