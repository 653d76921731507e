//! # Sync Error Types
//!
//! Error types for store client operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Protocol            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  SerializationFailed    │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  DeserializationFailed  │ │
//! │  │  ConfigLoad/Save│  │  Rejected       │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │     Domain      │  Validation and unknown quote ids, from           │
//! │  │  Core(CoreError)│  devis-core. Never reaches the store.             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use devis_core::CoreError;

/// Result type alias for client operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Store client error type.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid store URL.
    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The store service could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request did not complete in time.
    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    /// The store answered with an error status.
    #[error("Store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// Failed to serialize a request body.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Failed to deserialize a response body.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Validation failure or unknown quote, raised before any store call.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::SerializationFailed(err.to_string())
    }
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

impl From<devis_core::ValidationError> for SyncError {
    fn from(err: devis_core::ValidationError) -> Self {
        SyncError::Core(CoreError::Validation(err))
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// Returns true if the same request may succeed later.
    ///
    /// ## Retryable Errors
    /// - Connection failures
    /// - Timeouts
    /// - 5xx answers from the store
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::ConnectionFailed(_) | SyncError::Timeout(_) => true,
            SyncError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::InvalidUrl(_)
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the store could not be used at all (as opposed to a
    /// domain error raised locally).
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            SyncError::ConnectionFailed(_)
                | SyncError::Timeout(_)
                | SyncError::Rejected { .. }
                | SyncError::DeserializationFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devis_core::ValidationError;

    #[test]
    fn test_retryable_errors() {
        assert!(SyncError::ConnectionFailed("refused".into()).is_retryable());
        assert!(SyncError::Timeout(10).is_retryable());
        assert!(SyncError::Rejected {
            status: 500,
            message: "Failed to update papers".into()
        }
        .is_retryable());

        assert!(!SyncError::Rejected {
            status: 400,
            message: "bad body".into()
        }
        .is_retryable());
        assert!(!SyncError::InvalidConfig("bad config".into()).is_retryable());
    }

    #[test]
    fn test_validation_is_not_transport() {
        let err = SyncError::from(ValidationError::required("client"));
        assert!(!err.is_transport_error());
        assert!(err.to_string().contains("client"));
    }
}
