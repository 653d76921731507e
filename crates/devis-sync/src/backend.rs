//! # Store Backends
//!
//! The four operations the session needs from the store, behind a trait so
//! the session can run against the HTTP service or against memory.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuoteSession                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<dyn StoreBackend>                                                  │
//! │       ├── HttpStoreClient  ── reqwest ──► store-server ──► SQLite       │
//! │       └── MemoryStore      (tests, offline demos)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;

use devis_core::{Section, SectionPayload, StoreData};

use crate::error::{SyncError, SyncResult};

/// Operations of the key-value store service.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Checks that the store answers.
    async fn health(&self) -> SyncResult<()>;

    /// Reads every section. Missing sections read as empty.
    async fn fetch_data(&self) -> SyncResult<StoreData>;

    /// Replaces one section wholesale.
    async fn put_section(&self, payload: &SectionPayload) -> SyncResult<()>;

    /// Writes `data` if the store holds no paper. Returns whether it wrote.
    async fn initialize(&self, data: &StoreData) -> SyncResult<bool>;
}

// =============================================================================
// In-Memory Backend
// =============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    data: StoreData,
    offline: bool,
    fail_initialize: bool,
    failing_sections: HashSet<Section>,
    put_log: Vec<Section>,
}

/// A store held in memory, with switches to simulate failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `data`.
    pub fn with_data(data: StoreData) -> Self {
        MemoryStore {
            state: Mutex::new(MemoryState {
                data,
                ..Default::default()
            }),
        }
    }

    /// Makes every call fail as if the store were unreachable.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Makes `POST /initialize` fail with a server error.
    pub async fn set_fail_initialize(&self, fail: bool) {
        self.state.lock().await.fail_initialize = fail;
    }

    /// Makes writes of one section fail with a server error.
    pub async fn fail_section(&self, section: Section) {
        self.state.lock().await.failing_sections.insert(section);
    }

    /// Current contents.
    pub async fn snapshot(&self) -> StoreData {
        self.state.lock().await.data.clone()
    }

    /// Sections written so far, in call order, failed attempts included.
    pub async fn put_log(&self) -> Vec<Section> {
        self.state.lock().await.put_log.clone()
    }
}

fn unreachable() -> SyncError {
    SyncError::ConnectionFailed("store offline".to_string())
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn health(&self) -> SyncResult<()> {
        if self.state.lock().await.offline {
            return Err(unreachable());
        }
        Ok(())
    }

    async fn fetch_data(&self) -> SyncResult<StoreData> {
        let state = self.state.lock().await;
        if state.offline {
            return Err(unreachable());
        }
        Ok(state.data.clone())
    }

    async fn put_section(&self, payload: &SectionPayload) -> SyncResult<()> {
        let mut state = self.state.lock().await;
        if state.offline {
            return Err(unreachable());
        }

        let section = payload.section();
        state.put_log.push(section);

        if state.failing_sections.contains(&section) {
            return Err(SyncError::Rejected {
                status: 500,
                message: format!("Failed to update {section}"),
            });
        }

        state.data.apply(payload.clone());
        Ok(())
    }

    async fn initialize(&self, data: &StoreData) -> SyncResult<bool> {
        let mut state = self.state.lock().await;
        if state.offline {
            return Err(unreachable());
        }
        if state.fail_initialize {
            return Err(SyncError::Rejected {
                status: 500,
                message: "Failed to initialize data".to_string(),
            });
        }

        if state.data.has_papers() {
            return Ok(false);
        }
        state.data = data.clone();
        Ok(true)
    }
}
