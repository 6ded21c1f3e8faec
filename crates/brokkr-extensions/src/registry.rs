//! Extension registry client
//!
//! Resolves `(name, version)` against a remote npm-style registry. The
//! manifest for a package lives at `GET {base}/{name}` and lists every
//! published version with its tarball URL and shasum. Once resolved, a
//! descriptor is immutable for that `(name, version)`.

use brokkr_core::{Error, ExtensionDescriptor, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Dist-tag used when the caller does not pin a version
pub const LATEST_TAG: &str = "latest";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// npm-style registry manifest for one extension
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryManifest {
    pub name: String,

    #[serde(rename = "dist-tags", default)]
    pub dist_tags: HashMap<String, String>,

    pub versions: HashMap<String, VersionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub name: String,
    pub version: String,
    pub dist: DistInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistInfo {
    pub tarball: String,
    pub shasum: String,
}

/// HTTP client over a registry base URL
pub struct RegistryClient {
    base_url: String,
    client: reqwest::Client,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| Error::fetch(format!("Failed to create registry client: {}", err)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Fetch the full manifest for an extension
    pub async fn fetch_manifest(&self, name: &str) -> Result<RegistryManifest> {
        let url = format!("{}/{}", self.base_url, name);
        debug!("fetching registry manifest from {}", url);

        let response = self.client.get(&url).send().await.map_err(|err| {
            Error::fetch(format!(
                "Unable to find the requested extension: {} online ({})",
                name, err
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::fetch(format!(
                "Registry returned HTTP {} for {}: {}",
                status, name, body
            )));
        }

        response.json::<RegistryManifest>().await.map_err(|err| {
            Error::fetch(format!("Malformed registry manifest for {}: {}", name, err))
        })
    }

    /// Resolve a version (or the `latest` dist-tag) to a descriptor
    pub async fn resolve(&self, name: &str, version: &str) -> Result<ExtensionDescriptor> {
        let manifest = self.fetch_manifest(name).await?;

        let target = if version == LATEST_TAG {
            manifest
                .dist_tags
                .get(LATEST_TAG)
                .cloned()
                .ok_or_else(|| {
                    Error::not_found(format!("No '{}' dist-tag published for {}", LATEST_TAG, name))
                })?
        } else {
            version.to_string()
        };

        let entry = manifest.versions.get(&target).ok_or_else(|| {
            Error::not_found(format!(
                "Unable to find the requested version: {} online",
                target
            ))
        })?;

        Ok(ExtensionDescriptor {
            name: name.to_string(),
            version: target,
            tarball_url: entry.dist.tarball.clone(),
            expected_digest: entry.dist.shasum.clone(),
        })
    }
}
