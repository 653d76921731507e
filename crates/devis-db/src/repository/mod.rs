//! # Repository Module
//!
//! Database repository implementations for the store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Route handler                                                         │
//! │       │                                                                 │
//! │       │  db.store().replace_section(&payload)                          │
//! │       ▼                                                                 │
//! │  StoreRepository                                                       │
//! │  ├── get_section(&self, section)                                       │
//! │  ├── load_all(&self)                                                   │
//! │  ├── replace_section(&self, payload)                                   │
//! │  └── initialize(&self, data)                                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (kv_store)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`StoreRepository`](store::StoreRepository) - Section reads, writes and first-run initialization

pub mod store;
