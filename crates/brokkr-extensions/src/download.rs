//! Streamed artifact download
//!
//! Fetches a remote byte stream to a local staging path. No retry logic
//! lives here - transport failures surface to the caller, and a failed
//! transfer never leaves a partial file behind.

use brokkr_core::{Error, Result};
use futures_util::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP downloader for extension tarballs
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|err| Error::fetch(format!("Failed to create download client: {}", err)))?;
        Ok(Self { client })
    }

    /// Stream `url` into `dest`, returning the number of bytes written
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let result = self.stream_to_file(url, dest).await;
        if result.is_err() && dest.exists() {
            let _ = fs::remove_file(dest);
        }
        result
    }

    async fn stream_to_file(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| Error::fetch(format!("Unable to download {}: {}", url, err)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::fetch(format!(
                "Download of {} failed with HTTP {}: {}",
                url, status, body
            )));
        }

        let total = response.content_length();
        debug!("downloading {} ({:?} bytes) to {}", url, total, dest.display());

        let mut file = File::create(dest)?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk
                .map_err(|err| Error::fetch(format!("Transfer failed for {}: {}", url, err)))?;
            file.write_all(&chunk)?;
            written += chunk.len() as u64;
        }

        debug!("downloaded {} bytes to {}", written, dest.display());
        Ok(written)
    }
}
