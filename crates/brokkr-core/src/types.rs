//! Shared data model for DBMS instances, credentials, and extensions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Run status of a managed DBMS instance
///
/// Status is owned by the host environment; only the lifecycle controller
/// triggers transitions, and every read goes back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbmsStatus {
    Stopped,
    Starting,
    Started,
    Stopping,
}

impl fmt::Display for DbmsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Started => "started",
            Self::Stopping => "stopping",
        };
        write!(f, "{}", s)
    }
}

/// DBMS distribution edition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edition {
    Community,
    Enterprise,
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Community => write!(f, "community"),
            Self::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// One manageable database-system instance, as last observed from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbmsHandle {
    /// Opaque stable identifier
    pub id: String,
    pub name: String,
    pub edition: Edition,
    pub status: DbmsStatus,
}

/// Scope an access token is issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenScope {
    pub dbms_id: String,
    pub app_name: String,
    pub user_id: String,
}

impl TokenScope {
    pub fn new(
        dbms_id: impl Into<String>,
        app_name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            dbms_id: dbms_id.into(),
            app_name: app_name.into(),
            user_id: user_id.into(),
        }
    }
}

/// Credential returned by the access token broker
///
/// Created per request and never cached across DBMS restarts. The secret is
/// redacted from `Debug` output so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub enum AccessCredential {
    /// Signed bearer token from the trusted issuer (enterprise path)
    AccessToken(String),
    /// Operator-supplied or redirect-captured passphrase (community path)
    Passphrase(String),
}

impl AccessCredential {
    /// The secret itself, for handing to the DBMS driver
    pub fn secret(&self) -> &str {
        match self {
            Self::AccessToken(s) | Self::Passphrase(s) => s,
        }
    }
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessToken(_) => write!(f, "AccessCredential::AccessToken(<redacted>)"),
            Self::Passphrase(_) => write!(f, "AccessCredential::Passphrase(<redacted>)"),
        }
    }
}

/// Resolved registry metadata for one `(name, version)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    pub name: String,
    pub version: String,
    pub tarball_url: String,
    /// Hex digest the staged tarball must hash to (npm-style shasum)
    pub expected_digest: String,
}

/// A committed install under the extensions directory
///
/// Existence of the directory at `install_path` is the only source of truth
/// for "installed" - there is no separate manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledExtension {
    pub name: String,
    pub version: String,
    pub install_path: PathBuf,
}

impl InstalledExtension {
    /// Directory name under the install root, `name@version`
    pub fn dir_name(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}
