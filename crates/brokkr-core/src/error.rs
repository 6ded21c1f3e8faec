//! Error types for brokkr-core

use thiserror::Error;

/// Result type alias using brokkr-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Brokkr
///
/// Every failure a caller can observe maps to exactly one of these variants.
/// Upstream messages (registry response bodies, transport errors, issuer
/// refusals) are carried verbatim in the variant payloads.
#[derive(Error, Debug)]
pub enum Error {
    /// Registry entry or version does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Registry or artifact unreachable
    #[error("Fetch failed: {message}")]
    Fetch { message: String },

    /// Downloaded artifact digest does not match the registry digest
    #[error("Integrity check failed: expected digest {expected}, got {actual}")]
    Integrity { expected: String, actual: String },

    /// Missing, invalid, or refused credential
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Credential handshake did not complete within the wait bound
    #[error("Authentication timed out after {waited_secs}s")]
    AuthenticationTimeout { waited_secs: u64 },

    /// Operation invoked in a context it must not run in
    #[error("Not supported: {message}")]
    NotSupported { message: String },

    /// A concurrent install of the same package is already in flight
    #[error("Install already in progress for {name}@{version}")]
    InstallConflict { name: String, version: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create an integrity error
    pub fn integrity(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Integrity {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an authentication timeout error
    pub fn authentication_timeout(waited: std::time::Duration) -> Self {
        Self::AuthenticationTimeout {
            waited_secs: waited.as_secs(),
        }
    }

    /// Create a not supported error
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported {
            message: message.into(),
        }
    }

    /// Create an install conflict error
    pub fn install_conflict(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::InstallConflict {
            name: name.into(),
            version: version.into(),
        }
    }

    /// True for both authentication failure variants (refusal and timeout)
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::AuthenticationTimeout { .. }
        )
    }
}
