//! # Quote Session
//!
//! The working copy of the store used by the quoting screens.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  load()                                                                 │
//! │    fetch_data ──► error ─────────────► seed data + warning  (Offline)  │
//! │        │                                                                │
//! │        ├── has papers ───────────────► store data           (Loaded)   │
//! │        │                                                                │
//! │        └── empty ──► initialize(seed)                                   │
//! │                        ├── ok ───────► seed data            (Initialized)│
//! │                        └── error ────► seed data + error               │
//! │                                                                         │
//! │  update(changes)                                                        │
//! │    validate ──► apply locally ──► PUT each changed section in order    │
//! │                                     └── failure: notify, keep local    │
//! │                                                                         │
//! │  save_quote / set_quote_status / delete_quote                          │
//! │    QuoteBook rule ──► apply locally ──► PUT quotes ──► notify          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session never gives up on the local copy because of the store: a
//! failed save is reported and the change stays in memory, to be sent again
//! with the next save of the same section.

use std::sync::Arc;

use tracing::{debug, info, warn};

use devis_core::validation::validate_catalog;
use devis_core::{
    compute_quote, price_job, seed, Catalog, CoreError, CostBreakdown, JobConfig, PricedJob,
    Quote, QuoteBook, QuoteDocument, QuoteStatus, Section, SectionPayload, StoreChanges,
    StoreData, ValidationError,
};

use crate::backend::StoreBackend;
use crate::config::ClientConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::HttpStoreClient;
use crate::notify::NotificationSink;

/// Texts shown to the user.
pub mod messages {
    pub const OFFLINE: &str = "Utilisation des données locales (serveur non accessible)";
    pub const LOADED: &str = "Données chargées depuis le serveur";
    pub const INITIALIZED: &str = "Données initialisées sur le serveur";
    pub const INITIALIZATION_FAILED: &str = "Erreur lors de l'initialisation des données";
    pub const SYNC_FAILED: &str = "Erreur lors de la synchronisation avec le serveur";
    pub const CLIENT_REQUIRED: &str = "Veuillez entrer le nom du client";
    pub const PRODUCT_REQUIRED: &str = "Veuillez sélectionner un type de produit";
    pub const QUOTE_CREATED: &str = "Devis enregistré avec succès";
    pub const QUOTE_UPDATED: &str = "Devis mis à jour avec succès";
    pub const QUOTE_DELETED: &str = "Devis supprimé";
    pub const STATUS_CHANGED: &str = "Statut modifié";
    pub const PDF_EXPORTED: &str = "PDF téléchargé avec succès";
    pub const PDF_FAILED: &str = "Erreur lors du téléchargement du PDF";
    pub const CATALOG_SAVED: &str = "Base de données sauvegardée sur le serveur";
    pub const INVALID_DATA: &str = "Données invalides";
}

// =============================================================================
// Outcomes
// =============================================================================

/// How [`QuoteSession::load`] obtained its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store had data and it was loaded.
    Loaded,
    /// The store was empty and has been seeded.
    Initialized,
    /// The store was empty and seeding it failed. Working on the seed data.
    InitializationFailed,
    /// The store could not be read. Working on the seed data.
    Offline,
}

/// Result of saving sections to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Sections the store accepted, in save order.
    pub saved: Vec<Section>,
    /// Sections the store did not accept. Their local version is kept.
    pub failed: Vec<Section>,
}

impl UpdateReport {
    /// True when every section reached the store.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// =============================================================================
// Session
// =============================================================================

/// Working copy of the store plus the operations of the quoting screens.
pub struct QuoteSession {
    backend: Arc<dyn StoreBackend>,
    notifier: Arc<dyn NotificationSink>,
    data: StoreData,
}

impl QuoteSession {
    /// Creates a session holding the seed data until [`QuoteSession::load`].
    pub fn new(backend: Arc<dyn StoreBackend>, notifier: Arc<dyn NotificationSink>) -> Self {
        QuoteSession {
            backend,
            notifier,
            data: seed::default_store_data(),
        }
    }

    /// Creates a session talking to the store service described by `config`.
    pub fn connect(
        config: &ClientConfig,
        notifier: Arc<dyn NotificationSink>,
    ) -> SyncResult<Self> {
        let client = HttpStoreClient::new(config)?;
        info!(url = %client.base_url(), "Store client ready");
        Ok(Self::new(Arc::new(client), notifier))
    }

    /// Everything in the working copy.
    pub fn data(&self) -> &StoreData {
        &self.data
    }

    /// The reference data.
    pub fn catalog(&self) -> &Catalog {
        &self.data.catalog
    }

    /// All quotes, in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        &self.data.quotes
    }

    /// Finds a quote by id.
    pub fn quote(&self, id: &str) -> Option<&Quote> {
        self.data.quotes.iter().find(|q| q.id == id)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads the store into the working copy, seeding an empty store.
    ///
    /// Never fails: when the store cannot be used the session works on the
    /// seed data and says so through the notifier.
    pub async fn load(&mut self) -> LoadOutcome {
        let data = match self.backend.fetch_data().await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Store unreachable, using local data");
                self.data = seed::default_store_data();
                self.notifier.warning(messages::OFFLINE);
                return LoadOutcome::Offline;
            }
        };

        if data.has_papers() {
            info!(
                papers = data.catalog.papers.len(),
                quotes = data.quotes.len(),
                "Store data loaded"
            );
            self.data = data;
            self.notifier.success(messages::LOADED);
            return LoadOutcome::Loaded;
        }

        let seed_data = seed::default_store_data();
        let outcome = match self.backend.initialize(&seed_data).await {
            Ok(written) => {
                info!(written, "Store initialized with seed data");
                self.notifier.success(messages::INITIALIZED);
                LoadOutcome::Initialized
            }
            Err(e) => {
                warn!(error = %e, "Store initialization failed");
                self.notifier.error(messages::INITIALIZATION_FAILED);
                LoadOutcome::InitializationFailed
            }
        };

        self.data = seed_data;
        outcome
    }

    // =========================================================================
    // Partial Updates
    // =========================================================================

    /// Applies a partial change set locally, then saves each changed section.
    ///
    /// Catalog sections are validated first; an invalid change set changes
    /// nothing. Store failures do not make this fail: they are notified and
    /// listed in the report.
    pub async fn update(&mut self, changes: StoreChanges) -> SyncResult<UpdateReport> {
        let payloads = changes.into_payloads();
        if payloads.is_empty() {
            return Ok(UpdateReport::default());
        }

        let mut next = self.data.clone();
        for payload in &payloads {
            next.apply(payload.clone());
        }

        let touches_catalog = payloads.iter().any(|p| p.section() != Section::Quotes);
        if touches_catalog {
            if let Err(e) = validate_catalog(&next.catalog) {
                self.notifier
                    .error(&format!("{} : {}", messages::INVALID_DATA, e));
                return Err(e.into());
            }
        }

        self.data = next;
        Ok(self.save_sections(&payloads).await)
    }

    /// Replaces the whole catalog and saves its five sections.
    pub async fn save_catalog(&mut self, catalog: Catalog) -> SyncResult<UpdateReport> {
        let changes = StoreChanges::new()
            .papers(catalog.papers)
            .finishes(catalog.finishes)
            .machines(catalog.machines)
            .labor(catalog.labor)
            .margin_rules(catalog.margin_rules);

        let report = self.update(changes).await?;
        if report.is_complete() {
            self.notifier.success(messages::CATALOG_SAVED);
        }
        Ok(report)
    }

    async fn save_sections(&self, payloads: &[SectionPayload]) -> UpdateReport {
        let mut report = UpdateReport::default();

        for payload in payloads {
            let section = payload.section();
            match self.backend.put_section(payload).await {
                Ok(()) => {
                    debug!(section = %section, records = payload.len(), "Section synced");
                    report.saved.push(section);
                }
                Err(e) => {
                    warn!(section = %section, error = %e, "Section sync failed");
                    self.notifier
                        .error(&format!("{} ({})", messages::SYNC_FAILED, section));
                    report.failed.push(section);
                }
            }
        }

        report
    }

    async fn save_quotes(&self) -> UpdateReport {
        self.save_sections(&[self.data.section(Section::Quotes)])
            .await
    }

    // =========================================================================
    // Quotes
    // =========================================================================

    fn with_book<T>(
        &mut self,
        apply: impl FnOnce(&mut QuoteBook) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut book = QuoteBook::new(std::mem::take(&mut self.data.quotes));
        let result = apply(&mut book);
        self.data.quotes = book.into_quotes();
        result
    }

    /// Prices `config` against the current catalog and saves it as a quote.
    ///
    /// With `editing_id` the existing quote is updated (id, date and status
    /// kept), otherwise a draft is created.
    pub async fn save_quote(
        &mut self,
        editing_id: Option<&str>,
        client: &str,
        config: JobConfig,
    ) -> SyncResult<Quote> {
        let price_ht = compute_quote(&config, &self.data.catalog).price_ht;

        let result = self.with_book(|book| match editing_id {
            Some(id) => book.update_quote(id, client, config, price_ht),
            None => book.create_quote(client, config, price_ht),
        });

        let quote = match result {
            Ok(quote) => quote,
            Err(e) => {
                self.notify_rejected(&e);
                return Err(e.into());
            }
        };

        info!(
            quote_id = %quote.id,
            price_ht = quote.price_ht,
            updated = editing_id.is_some(),
            "Quote saved"
        );

        self.save_quotes().await;
        self.notifier.success(if editing_id.is_some() {
            messages::QUOTE_UPDATED
        } else {
            messages::QUOTE_CREATED
        });

        Ok(quote)
    }

    /// Sets the status of a quote. Every transition is allowed.
    pub async fn set_quote_status(&mut self, id: &str, status: QuoteStatus) -> SyncResult<Quote> {
        let quote = self.with_book(|book| book.set_status(id, status))?;
        debug!(quote_id = %id, status = %status, "Quote status changed");

        self.save_quotes().await;
        self.notifier
            .success(&format!("{} : {}", messages::STATUS_CHANGED, status));
        Ok(quote)
    }

    /// Deletes a quote, whatever its status.
    pub async fn delete_quote(&mut self, id: &str) -> SyncResult<Quote> {
        let removed = self.with_book(|book| book.delete_quote(id))?;
        debug!(quote_id = %id, "Quote deleted");

        self.save_quotes().await;
        self.notifier.success(messages::QUOTE_DELETED);
        Ok(removed)
    }

    /// Quotes whose client or product contains `filter`, case-insensitively.
    pub fn list_quotes(&self, filter: Option<&str>) -> Vec<Quote> {
        QuoteBook::new(self.data.quotes.clone())
            .list_quotes(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    fn notify_rejected(&self, err: &CoreError) {
        let message = match err {
            CoreError::Validation(ValidationError::Required { field }) if field == "client" => {
                messages::CLIENT_REQUIRED.to_string()
            }
            CoreError::Validation(ValidationError::Required { field }) if field == "product" => {
                messages::PRODUCT_REQUIRED.to_string()
            }
            other => other.to_string(),
        };
        self.notifier.error(&message);
    }

    // =========================================================================
    // Pricing & Documents
    // =========================================================================

    /// Prices a job against the current catalog.
    pub fn price(&self, config: &JobConfig) -> PricedJob {
        price_job(config, &self.data.catalog)
    }

    /// Recomputes the breakdown of a saved quote from its configuration.
    pub fn breakdown_for(&self, quote_id: &str) -> SyncResult<CostBreakdown> {
        let quote = self
            .quote(quote_id)
            .ok_or_else(|| CoreError::QuoteNotFound(quote_id.to_string()))?;
        Ok(compute_quote(&quote.configuration, &self.data.catalog))
    }

    /// Builds the printable fields of a quote.
    pub fn export_document(&self, quote_id: &str) -> SyncResult<QuoteDocument> {
        match self.quote(quote_id) {
            Some(quote) => {
                let document = QuoteDocument::build(quote, &self.data.catalog);
                debug!(quote_id = %quote_id, file = %document.file_name(), "Quote document built");
                self.notifier.success(messages::PDF_EXPORTED);
                Ok(document)
            }
            None => {
                warn!(quote_id = %quote_id, "Cannot export unknown quote");
                self.notifier.error(messages::PDF_FAILED);
                Err(SyncError::Core(CoreError::QuoteNotFound(quote_id.to_string())))
            }
        }
    }
}

impl std::fmt::Debug for QuoteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteSession")
            .field("papers", &self.data.catalog.papers.len())
            .field("quotes", &self.data.quotes.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use crate::notify::{CollectingSink, NotificationLevel};

    fn session_with(store: &Arc<MemoryStore>, sink: &Arc<CollectingSink>) -> QuoteSession {
        QuoteSession::new(store.clone(), sink.clone())
    }

    fn flyer() -> JobConfig {
        JobConfig {
            product_type: "Flyer".to_string(),
            paper_id: Some("1".to_string()),
            quantity: 500,
            margin: 40.0,
            ..Default::default()
        }
    }

    async fn loaded() -> (Arc<MemoryStore>, Arc<CollectingSink>, QuoteSession) {
        let store = Arc::new(MemoryStore::with_data(seed::default_store_data()));
        let sink = Arc::new(CollectingSink::new());
        let mut session = session_with(&store, &sink);
        assert_eq!(session.load().await, LoadOutcome::Loaded);
        sink.drain();
        (store, sink, session)
    }

    #[tokio::test]
    async fn test_load_existing_store() {
        let mut data = seed::default_store_data();
        data.quotes.truncate(1);
        let store = Arc::new(MemoryStore::with_data(data));
        let sink = Arc::new(CollectingSink::new());
        let mut session = session_with(&store, &sink);

        assert_eq!(session.load().await, LoadOutcome::Loaded);
        assert_eq!(session.quotes().len(), 1);
        assert_eq!(sink.messages(NotificationLevel::Success), vec![messages::LOADED]);
    }

    #[tokio::test]
    async fn test_load_initializes_empty_store() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(CollectingSink::new());
        let mut session = session_with(&store, &sink);

        assert_eq!(session.load().await, LoadOutcome::Initialized);
        assert_eq!(store.snapshot().await, seed::default_store_data());
        assert_eq!(session.data(), &seed::default_store_data());
        assert_eq!(
            sink.messages(NotificationLevel::Success),
            vec![messages::INITIALIZED]
        );
    }

    #[tokio::test]
    async fn test_load_falls_back_when_offline() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true).await;
        let sink = Arc::new(CollectingSink::new());
        let mut session = session_with(&store, &sink);

        assert_eq!(session.load().await, LoadOutcome::Offline);
        assert_eq!(session.catalog(), &seed::default_catalog());
        assert_eq!(sink.messages(NotificationLevel::Warning), vec![messages::OFFLINE]);
    }

    #[tokio::test]
    async fn test_load_initialization_failure_keeps_seed() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_initialize(true).await;
        let sink = Arc::new(CollectingSink::new());
        let mut session = session_with(&store, &sink);

        assert_eq!(session.load().await, LoadOutcome::InitializationFailed);
        assert_eq!(session.data(), &seed::default_store_data());
        assert!(!store.snapshot().await.has_papers());
        assert_eq!(
            sink.messages(NotificationLevel::Error),
            vec![messages::INITIALIZATION_FAILED]
        );
    }

    #[tokio::test]
    async fn test_create_quote_prices_and_saves() {
        let (store, sink, mut session) = loaded().await;

        let quote = session
            .save_quote(None, "Boulangerie Martin", flyer())
            .await
            .unwrap();

        let expected = compute_quote(&flyer(), &seed::default_catalog()).price_ht;
        assert_eq!(quote.price_ht.to_bits(), expected.to_bits());
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(session.quotes().len(), 4);

        assert_eq!(store.put_log().await, vec![Section::Quotes]);
        assert_eq!(store.snapshot().await.quotes, session.quotes().to_vec());
        assert_eq!(
            sink.messages(NotificationLevel::Success),
            vec![messages::QUOTE_CREATED]
        );
    }

    #[tokio::test]
    async fn test_saved_quote_breakdown_is_reproducible() {
        let (_store, _sink, mut session) = loaded().await;
        let quote = session.save_quote(None, "Client", flyer()).await.unwrap();

        let breakdown = session.breakdown_for(&quote.id).unwrap();
        assert_eq!(breakdown.price_ht.to_bits(), quote.price_ht.to_bits());
        assert_eq!(breakdown, session.price(&flyer()).breakdown);
    }

    #[tokio::test]
    async fn test_update_quote_keeps_status() {
        let (_store, sink, mut session) = loaded().await;

        let mut config = flyer();
        config.express = true;
        let quote = session
            .save_quote(Some("2"), "Restaurant Le Gourmet", config)
            .await
            .unwrap();

        assert_eq!(quote.id, "2");
        assert_eq!(quote.status, QuoteStatus::Sent);
        assert_eq!(session.quotes().len(), 3);
        assert_eq!(
            sink.messages(NotificationLevel::Success),
            vec![messages::QUOTE_UPDATED]
        );
    }

    #[tokio::test]
    async fn test_save_quote_validation_messages() {
        let (store, sink, mut session) = loaded().await;

        assert!(session.save_quote(None, "  ", flyer()).await.is_err());

        let no_product = JobConfig {
            product_type: String::new(),
            ..flyer()
        };
        assert!(session.save_quote(None, "Client", no_product).await.is_err());

        assert_eq!(
            sink.messages(NotificationLevel::Error),
            vec![messages::CLIENT_REQUIRED, messages::PRODUCT_REQUIRED]
        );
        assert_eq!(session.quotes().len(), 3);
        assert!(store.put_log().await.is_empty());
    }

    #[tokio::test]
    async fn test_status_change_and_delete() {
        let (store, sink, mut session) = loaded().await;

        let quote = session
            .set_quote_status("3", QuoteStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(quote.status, QuoteStatus::Accepted);

        session.delete_quote("1").await.unwrap();
        assert!(session.quote("1").is_none());
        assert_eq!(store.snapshot().await.quotes.len(), 2);

        assert_eq!(
            sink.messages(NotificationLevel::Success),
            vec!["Statut modifié : Accepté", messages::QUOTE_DELETED]
        );

        assert!(matches!(
            session.delete_quote("1").await,
            Err(SyncError::Core(CoreError::QuoteNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_failed_section_is_reported_and_kept_locally() {
        let (store, sink, mut session) = loaded().await;
        store.fail_section(Section::Machines).await;

        let mut catalog = session.catalog().clone();
        catalog.papers.truncate(2);
        catalog.machines[0].hourly_cost = 50.0;

        let report = session.save_catalog(catalog.clone()).await.unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.failed, vec![Section::Machines]);
        assert_eq!(
            report.saved,
            vec![
                Section::Papers,
                Section::Finishes,
                Section::Labor,
                Section::MarginRules
            ]
        );

        // Local copy has the change, the store only the accepted sections
        assert_eq!(session.catalog(), &catalog);
        let stored = store.snapshot().await;
        assert_eq!(stored.catalog.papers.len(), 2);
        assert_eq!(stored.catalog.machines[0].hourly_cost, 45.0);

        let errors = sink.messages(NotificationLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("machines"));
        assert!(sink.messages(NotificationLevel::Success).is_empty());
    }

    #[tokio::test]
    async fn test_save_catalog_success() {
        let (store, sink, mut session) = loaded().await;

        let report = session.save_catalog(seed::default_catalog()).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.saved.len(), 5);
        assert_eq!(store.put_log().await.len(), 5);
        assert_eq!(
            sink.messages(NotificationLevel::Success),
            vec![messages::CATALOG_SAVED]
        );
    }

    #[tokio::test]
    async fn test_invalid_catalog_changes_nothing() {
        let (store, _sink, mut session) = loaded().await;
        let before = session.data().clone();

        let mut machines = seed::default_catalog().machines;
        machines[0].cadence = 0.0;
        let result = session.update(StoreChanges::new().machines(machines)).await;

        assert!(matches!(result, Err(SyncError::Core(CoreError::Validation(_)))));
        assert_eq!(session.data(), &before);
        assert!(store.put_log().await.is_empty());
    }

    #[tokio::test]
    async fn test_offline_quote_is_kept_locally() {
        let (store, sink, mut session) = loaded().await;
        store.set_offline(true).await;

        let quote = session.save_quote(None, "Client", flyer()).await.unwrap();

        assert!(session.quote(&quote.id).is_some());
        assert_eq!(
            sink.messages(NotificationLevel::Error),
            vec!["Erreur lors de la synchronisation avec le serveur (quotes)"]
        );
    }

    #[tokio::test]
    async fn test_export_document() {
        let (_store, sink, session) = loaded().await;

        let document = session.export_document("1").unwrap();
        assert_eq!(document.client, "Société ABC");
        assert!(session.export_document("missing").is_err());

        assert_eq!(
            sink.messages(NotificationLevel::Success),
            vec![messages::PDF_EXPORTED]
        );
        assert_eq!(sink.messages(NotificationLevel::Error), vec![messages::PDF_FAILED]);
    }

    #[tokio::test]
    async fn test_list_quotes_filter() {
        let (_store, _sink, session) = loaded().await;
        assert_eq!(session.list_quotes(None).len(), 3);

        let hits = session.list_quotes(Some("beauté"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "3");
    }
}
