//! Shared HTTP client and binary downloads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notice::config::Settings;
use notice::sources::SourceError;
use reqwest::Client;
use url::Url;

pub fn build_client(settings: &Settings) -> Result<Client, SourceError> {
    Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(|e| SourceError::Request(e.to_string()))
}

/// GET `url` and return the response body, failing on non-success status.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, SourceError> {
    let url = Url::parse(url).map_err(|e| SourceError::Request(format!("{}: {}", url, e)))?;
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| SourceError::Request(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Request(format!("HTTP {} for {}", status, url)));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| SourceError::Request(e.to_string()))?;
    if bytes.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(bytes.to_vec())
}

/// Download `url` to `<dir>/notice.pdf`.
pub async fn download_pdf(client: &Client, url: &str, dir: &Path) -> Result<PathBuf, SourceError> {
    let bytes = fetch_bytes(client, url).await?;
    let path = dir.join("notice.pdf");
    tokio::fs::write(&path, &bytes).await?;
    tracing::debug!("downloaded {} bytes from {}", bytes.len(), url);
    Ok(path)
}
