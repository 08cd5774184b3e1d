//! Source document retrieval from URLs, files, and stdin.
//!
//! URL fetching goes through [`validate_source_url`] first, so the scheme and
//! domain allow-list are enforced before any request leaves the process.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::{PagecutError, Result};

/// HTTP client configuration for fetching source pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Host substrings a URL must contain; empty allows any host.
    pub allowed_domains: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 20, user_agent: "Mozilla/5.0".to_string(), allowed_domains: Vec::new() }
    }
}

impl FetchConfig {
    /// Returns a copy restricted to the given domains.
    pub fn with_allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_domains = domains.into_iter().map(Into::into).collect();
        self
    }
}

/// Parses a source URL and checks it against the allow-list.
///
/// # Errors
///
/// - [`PagecutError::InvalidUrl`] if the URL does not parse, is not http(s),
///   or has no host.
/// - [`PagecutError::DomainNotAllowed`] if `allowed_domains` is non-empty and
///   the host contains none of them.
///
/// ```rust
/// use pagecut_core::{FetchConfig, validate_source_url};
///
/// let config = FetchConfig::default().with_allowed_domains(["safeguardglobal.com"]);
/// assert!(validate_source_url("https://www.safeguardglobal.com/blog/x", &config).is_ok());
/// assert!(validate_source_url("https://example.com/blog/x", &config).is_err());
/// ```
pub fn validate_source_url(url: &str, config: &FetchConfig) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| PagecutError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PagecutError::InvalidUrl(format!(
            "unsupported scheme '{}', expected http or https",
            parsed.scheme()
        )));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| PagecutError::InvalidUrl("URL has no host".to_string()))?;

    if !config.allowed_domains.is_empty()
        && !config.allowed_domains.iter().any(|domain| host.contains(domain.as_str()))
    {
        return Err(PagecutError::DomainNotAllowed { host: host.to_string() });
    }

    Ok(parsed)
}

/// Fetches HTML content from a URL.
///
/// Performs an HTTP GET, follows redirects and returns the body as text.
/// Non-success statuses are errors.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = validate_source_url(url, config)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(PagecutError::HttpError)?;

    debug!(url = %parsed_url, timeout = config.timeout, "fetching source page");

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                PagecutError::Timeout { timeout: config.timeout }
            } else {
                PagecutError::HttpError(e)
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PagecutError::HttpStatus { status: status.as_u16() });
    }

    let content = response.text().await?;
    debug!(bytes = content.len(), "source page fetched");

    Ok(content)
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(PagecutError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(PagecutError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(PagecutError::from)?;

    Ok(buffer)
}
