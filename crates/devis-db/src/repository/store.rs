//! # Store Repository
//!
//! Reads and writes the six sections of the key-value store.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kv_store                                                               │
//! │  ┌──────────────────┬──────────────────────────────┬────────────────┐  │
//! │  │ key              │ value (JSON array)           │ updated_at     │  │
//! │  ├──────────────────┼──────────────────────────────┼────────────────┤  │
//! │  │ app:papers       │ [{"id":"1","name":...},...]  │ 2025-11-03T... │  │
//! │  │ app:finishes     │ [...]                        │ ...            │  │
//! │  │ ...              │                              │                │  │
//! │  │ app:quotes       │ [...]                        │ ...            │  │
//! │  └──────────────────┴──────────────────────────────┴────────────────┘  │
//! │                                                                         │
//! │  replace_section:  UPSERT one row (last write wins)                    │
//! │  load_all:         one SELECT per section, missing → []                │
//! │  initialize:       one transaction, writes only when papers is empty   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use devis_core::{Section, SectionPayload, StoreData};

const SELECT_VALUE: &str = "SELECT value FROM kv_store WHERE key = ?1";

const UPSERT_VALUE: &str = r#"
    INSERT INTO kv_store (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

/// Repository for the key-value store.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Reads one section. A missing key reads as an empty section.
    pub async fn get_section(&self, section: Section) -> DbResult<SectionPayload> {
        let raw: Option<String> = sqlx::query_scalar(SELECT_VALUE)
            .bind(section.store_key())
            .fetch_optional(&self.pool)
            .await?;

        decode_section(section, raw)
    }

    /// Reads every section.
    pub async fn load_all(&self) -> DbResult<StoreData> {
        let mut data = StoreData::default();
        for section in Section::ALL {
            data.apply(self.get_section(section).await?);
        }

        debug!(
            papers = data.catalog.papers.len(),
            quotes = data.quotes.len(),
            "Loaded store data"
        );

        Ok(data)
    }

    /// Replaces one section wholesale.
    pub async fn replace_section(&self, payload: &SectionPayload) -> DbResult<()> {
        let section = payload.section();
        let value = serde_json::to_string(&payload.to_json()?)?;

        sqlx::query(UPSERT_VALUE)
            .bind(section.store_key())
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        debug!(section = %section, records = payload.len(), "Section saved");
        Ok(())
    }

    /// Writes `data` to every section if no paper is stored yet.
    ///
    /// ## Returns
    /// * `Ok(true)` - The store was empty and now holds `data`
    /// * `Ok(false)` - Papers already exist, nothing was written
    pub async fn initialize(&self, data: StoreData) -> DbResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        if has_papers(&mut tx).await? {
            debug!("Store already initialized");
            return Ok(false);
        }

        let now = Utc::now().to_rfc3339();
        for payload in data.into_sections() {
            let value = serde_json::to_string(&payload.to_json()?)?;
            sqlx::query(UPSERT_VALUE)
                .bind(payload.section().store_key())
                .bind(value)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!("Store initialized");
        Ok(true)
    }
}

async fn has_papers(tx: &mut Transaction<'_, Sqlite>) -> DbResult<bool> {
    let key = Section::Papers.store_key();
    let raw: Option<String> = sqlx::query_scalar(SELECT_VALUE)
        .bind(key)
        .fetch_optional(&mut **tx)
        .await?;

    match raw {
        None => Ok(false),
        Some(raw) => {
            let papers: Vec<serde_json::Value> =
                serde_json::from_str(&raw).map_err(|e| DbError::corrupt(key, &e))?;
            Ok(!papers.is_empty())
        }
    }
}

fn decode_section(section: Section, raw: Option<String>) -> DbResult<SectionPayload> {
    let key = section.store_key();
    let value = match raw {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| DbError::corrupt(key, &e))?,
        None => serde_json::Value::Array(Vec::new()),
    };

    SectionPayload::from_json(section, value).map_err(|e| DbError::corrupt(key, &e))
}

// =============================================================================
// Unit Tests
// =============================================================================
