//! Access token broker
//!
//! Decides and executes the authentication strategy for a target DBMS:
//! enterprise editions exchange a signed token with the trusted issuer,
//! community editions use a passphrase - solicited interactively, or captured
//! through the browser-redirect handshake when no operator is present.
//!
//! The broker assumes the DBMS is already running; callers go through the
//! lifecycle controller first.

use crate::capture::CaptureSession;
use crate::host::{SecretPrompt, TokenIssuer};
use brokkr_core::{AccessCredential, Edition, Error, Result, TokenScope};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Where the redirect capture server binds and how long to wait for the
/// callback before giving up
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Broker for per-request access credentials
pub struct AccessTokenBroker {
    issuer: Arc<dyn TokenIssuer>,
    prompt: Arc<dyn SecretPrompt>,
    capture: CaptureSettings,
}

impl AccessTokenBroker {
    pub fn new(issuer: Arc<dyn TokenIssuer>, prompt: Arc<dyn SecretPrompt>) -> Self {
        Self {
            issuer,
            prompt,
            capture: CaptureSettings::default(),
        }
    }

    /// Override the redirect capture bind address and wait bound
    pub fn with_capture(mut self, capture: CaptureSettings) -> Self {
        self.capture = capture;
        self
    }

    /// Obtain a credential for the given scope
    ///
    /// Strict branch per edition, no fallback mixing: enterprise always goes
    /// through the issuer; community editions never do.
    pub async fn credential(
        &self,
        scope: &TokenScope,
        edition: Edition,
        interactive: bool,
    ) -> Result<AccessCredential> {
        match edition {
            Edition::Enterprise => {
                debug!("requesting access token for {} from issuer", scope.dbms_id);
                let token = self.issuer.issue_token(scope).await.map_err(|err| {
                    if err.is_authentication() {
                        err
                    } else {
                        Error::authentication(err.to_string())
                    }
                })?;
                Ok(AccessCredential::AccessToken(token))
            }
            Edition::Community if interactive => {
                let passphrase = self.prompt.ask_secret("Enter passphrase").await?;
                Ok(AccessCredential::Passphrase(passphrase))
            }
            Edition::Community => {
                debug!(
                    "no interactive context, capturing token via redirect on {}:{}",
                    self.capture.host, self.capture.port
                );
                let session = CaptureSession::spawn(&self.capture.host, self.capture.port)?;
                let timeout = self.capture.timeout;
                let token = tokio::task::spawn_blocking(move || session.wait(timeout))
                    .await
                    .map_err(|err| {
                        Error::authentication(format!("Capture wait task failed: {}", err))
                    })??;
                Ok(AccessCredential::Passphrase(token))
            }
        }
    }
}
