//! Collaborator traits for the host environment
//!
//! Everything that actually owns DBMS processes or secrets lives behind these
//! traits so controllers take explicit interface parameters and tests can
//! substitute doubles.

use async_trait::async_trait;
use brokkr_core::{DbmsHandle, DbmsStatus, Result, TokenScope};

/// Host-side process and status provider for DBMS instances
///
/// Status is owned by the host: callers trigger transitions through `start`
/// and `stop` but always re-read the outcome, never caching a status value.
#[async_trait]
pub trait DbmsHost: Send + Sync {
    /// Look up the current handle for a DBMS instance
    async fn get(&self, dbms_id: &str) -> Result<DbmsHandle>;

    /// Ask the host to start the instance
    async fn start(&self, dbms_id: &str) -> Result<()>;

    /// Ask the host to stop the instance
    async fn stop(&self, dbms_id: &str) -> Result<()>;

    /// Re-read just the run status
    async fn current_status(&self, dbms_id: &str) -> Result<DbmsStatus> {
        Ok(self.get(dbms_id).await?.status)
    }
}

/// Trusted host-side issuer of signed access tokens (enterprise editions)
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue_token(&self, scope: &TokenScope) -> Result<String>;
}

/// Interactive prompt surface for soliciting a passphrase from the operator
///
/// Rendering is external; implementations typically wrap a terminal prompt.
#[async_trait]
pub trait SecretPrompt: Send + Sync {
    async fn ask_secret(&self, prompt: &str) -> Result<String>;
}
