//! # HTTP Store Client
//!
//! [`StoreBackend`] over the store service's JSON API.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  health()        GET  {base}/health       → {"status":"ok"}             │
//! │  fetch_data()    GET  {base}/data         → StoreData                   │
//! │  put_section(p)  PUT  {base}/{section}    ← {"<section>": [...]}        │
//! │  initialize(d)   POST {base}/initialize   ← StoreData                   │
//! │                                                                         │
//! │  non-2xx  → SyncError::Rejected { status, "<error>: <details>" }        │
//! │  timeout  → SyncError::Timeout                                          │
//! │  refused  → SyncError::ConnectionFailed                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use devis_core::wire::{ErrorBody, HealthResponse, InitializeResponse};
use devis_core::{SectionPayload, StoreData};

use crate::backend::StoreBackend;
use crate::config::ClientConfig;
use crate::error::{SyncError, SyncResult};

/// Client for the store service.
#[derive(Debug, Clone)]
pub struct HttpStoreClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpStoreClient {
    /// Builds a client from validated configuration.
    pub fn new(config: &ClientConfig) -> SyncResult<Self> {
        config.validate()?;

        // Url::join replaces the last segment unless the base ends with '/'
        let mut base = config.store_url().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("devis-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpStoreClient {
            client,
            base_url,
            api_key: config.api_key().map(str::to_string),
            timeout_secs: config.store.timeout_secs,
        })
    }

    /// Base URL every endpoint is joined to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> SyncResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> SyncResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) if body.details.is_empty() => body.error,
            Ok(body) => format!("{}: {}", body.error, body.details),
            Err(_) => text,
        };

        warn!(status = status.as_u16(), %message, "Store rejected request");
        Err(SyncError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> SyncResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| SyncError::DeserializationFailed(e.to_string()))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> SyncError {
        if err.is_timeout() {
            SyncError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            SyncError::DeserializationFailed(err.to_string())
        } else {
            SyncError::ConnectionFailed(err.to_string())
        }
    }
}

#[async_trait]
impl StoreBackend for HttpStoreClient {
    async fn health(&self) -> SyncResult<()> {
        let url = self.endpoint("health")?;
        let response = self.send(self.client.get(url)).await?;
        let body: HealthResponse = self.read_json(response).await?;

        if !body.is_ok() {
            return Err(SyncError::Rejected {
                status: 200,
                message: format!("unexpected health status '{}'", body.status),
            });
        }
        Ok(())
    }

    async fn fetch_data(&self) -> SyncResult<StoreData> {
        let url = self.endpoint("data")?;
        let response = self.send(self.client.get(url)).await?;
        let data: StoreData = self.read_json(response).await?;

        debug!(
            papers = data.catalog.papers.len(),
            quotes = data.quotes.len(),
            "Fetched store data"
        );
        Ok(data)
    }

    async fn put_section(&self, payload: &SectionPayload) -> SyncResult<()> {
        let section = payload.section();
        let url = self.endpoint(section.name())?;
        let body = payload.to_body()?;

        self.send(self.client.put(url).json(&body)).await?;

        debug!(section = %section, records = payload.len(), "Section saved");
        Ok(())
    }

    async fn initialize(&self, data: &StoreData) -> SyncResult<bool> {
        let url = self.endpoint("initialize")?;
        let response = self.send(self.client.post(url).json(data)).await?;
        let body: InitializeResponse = self.read_json(response).await?;

        debug!(initialized = body.initialized, "Store initialize answered");
        Ok(body.initialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devis_core::{seed, Section};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: &str) -> HttpStoreClient {
        let mut config = ClientConfig::default();
        config.store.url = server.uri();
        config.store.api_key = api_key.to_string();
        HttpStoreClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        client_for(&server, "").health().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_data_defaults_missing_sections() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "papers": [],
                "quotes": serde_json::to_value(seed::sample_quotes()).unwrap()
            })))
            .mount(&server)
            .await;

        let data = client_for(&server, "").fetch_data().await.unwrap();
        assert!(!data.has_papers());
        assert!(data.catalog.machines.is_empty());
        assert_eq!(data.quotes, seed::sample_quotes());
    }

    #[tokio::test]
    async fn test_put_section_sends_wrapped_body_and_token() {
        let server = MockServer::start().await;
        let catalog = seed::default_catalog();

        Mock::given(method("PUT"))
            .and(path("/marginRules"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({
                "marginRules": serde_json::to_value(&catalog.margin_rules).unwrap()
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let payload = SectionPayload::MarginRules(catalog.margin_rules.clone());
        client_for(&server, "secret").put_section(&payload).await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_maps_to_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/quotes"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Failed to update quotes",
                "details": "disk full"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, "")
            .put_section(&SectionPayload::Quotes(Vec::new()))
            .await
            .unwrap_err();

        match &err {
            SyncError::Rejected { status, message } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "Failed to update quotes: disk full");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_initialize_reports_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/initialize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "initialized": false,
                "message": "Data already exists"
            })))
            .mount(&server)
            .await;

        let written = client_for(&server, "")
            .initialize(&seed::default_store_data())
            .await
            .unwrap();
        assert!(!written);
    }

    #[tokio::test]
    async fn test_base_url_with_path_prefix() {
        let mut config = ClientConfig::default();
        config.store.url = "http://print-server:8787/store".to_string();
        let client = HttpStoreClient::new(&config).unwrap();

        assert_eq!(
            client.endpoint(Section::Papers.name()).unwrap().as_str(),
            "http://print-server:8787/store/papers"
        );
    }

    #[tokio::test]
    async fn test_unreachable_store_is_retryable() {
        let mut config = ClientConfig::default();
        // Port 9 (discard) is closed on test machines
        config.store.url = "http://127.0.0.1:9".to_string();
        config.store.timeout_secs = 2;

        let err = HttpStoreClient::new(&config)
            .unwrap()
            .fetch_data()
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(err.is_transport_error());
    }
}
