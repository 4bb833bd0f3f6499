//! Remote CSV download for URL imports

use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::ImportConfig;
use crate::errors::{RegistryError, RegistryResult};
use crate::logger::{self, LogTag};

/// Only plain web URLs are fetched
fn parse_source_url(raw: &str) -> RegistryResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| RegistryError::Fetch(format!("invalid URL '{}': {}", raw.trim(), e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RegistryError::Fetch(format!(
            "unsupported URL scheme '{}' (use http or https)",
            other
        ))),
    }
}

/// Download a CSV document, bounded by the configured timeout and size cap
pub async fn fetch_csv(raw_url: &str, config: &ImportConfig) -> RegistryResult<Vec<u8>> {
    let url = parse_source_url(raw_url)?;
    let limit = config.max_fetch_bytes;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .user_agent(concat!("netregistry/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RegistryError::Fetch(format!("failed to build HTTP client: {}", e)))?;

    logger::info(LogTag::Import, &format!("Fetching CSV from {}", url));

    let mut response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| RegistryError::Fetch(format!("request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RegistryError::Fetch(format!(
            "{} responded with HTTP {}",
            url, status
        )));
    }

    if let Some(length) = response.content_length() {
        if length > limit as u64 {
            return Err(RegistryError::Fetch(format!(
                "document is {} bytes, limit is {}",
                length, limit
            )));
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| RegistryError::Fetch(format!("failed reading body from {}: {}", url, e)))?
    {
        if body.len() + chunk.len() > limit {
            return Err(RegistryError::Fetch(format!(
                "document exceeds the {} byte limit",
                limit
            )));
        }
        body.extend_from_slice(&chunk);
    }

    logger::debug(
        LogTag::Import,
        &format!("Fetched {} bytes from {}", body.len(), url),
    );
    Ok(body)
}
