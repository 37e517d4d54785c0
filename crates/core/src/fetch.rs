//! Page fetching from URLs, files, and stdin.
//!
//! This module provides the raw byte-level access used by the document
//! sources: HTTP/HTTPS URLs, local files, and standard input.

use std::fs;
use std::path::Path;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{AscensionError, Result};

/// HTTP client configuration for fetching wiki pages.
///
/// This struct controls timeout and user agent settings for HTTP requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Ascension/0.1; stat scraper)".to_string() }
    }
}

/// Builds a reusable HTTP client honouring the configured timeout.
#[cfg(feature = "fetch")]
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(AscensionError::HttpError)
}

/// Fetches HTML content from a URL.
///
/// Performs an HTTP GET request and returns the response body as text.
/// Non-success status codes are errors.
#[cfg(feature = "fetch")]
pub async fn fetch_url(client: &Client, url: &Url, config: &FetchConfig) -> Result<String> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AscensionError::InvalidUrl(format!(
            "URL must use http:// or https://, got {}",
            url
        )));
    }

    let response = client
        .get(url.clone())
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                AscensionError::Timeout { timeout: config.timeout }
            } else {
                AscensionError::HttpError(e)
            }
        })?
        .error_for_status()?;

    let content = response.text().await?;

    Ok(content)
}

/// Reads content from a local file.
pub fn fetch_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        Err(AscensionError::FileNotFound(path.to_path_buf()))
    } else {
        fs::read_to_string(path).map_err(AscensionError::from)
    }
}

/// Reads content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(AscensionError::from)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("Ascension"));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_rejects_non_http_scheme() {
        let config = FetchConfig::default();
        let client = build_client(&config).unwrap();
        let url = Url::parse("file:///etc/hosts").unwrap();

        let result = fetch_url(&client, &url, &config).await;
        assert!(matches!(result, Err(AscensionError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(AscensionError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_reads_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<html></html>").unwrap();

        assert_eq!(fetch_file(&path).unwrap(), "<html></html>");
    }
}
