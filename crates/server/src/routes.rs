//! `POST /scrape-blog` handler.

use std::future::Future;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use pagecut_core::{Extractor, FetchConfig, PagecutError, ScrapeResult, fetch_url, validate_source_url};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ApiError;

/// Retrieves the raw HTML for a validated URL.
pub trait PageFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str, config: &FetchConfig) -> impl Future<Output = pagecut_core::Result<String>> + Send;
}

/// Fetches over HTTP with `reqwest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str, config: &FetchConfig) -> impl Future<Output = pagecut_core::Result<String>> + Send {
        fetch_url(url, config)
    }
}

pub struct AppState<F> {
    pub extractor: Extractor,
    pub fetch: FetchConfig,
    pub fetcher: F,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: Option<String>,
}

/// Body is read as JSON whatever the declared content type.
fn parse_request(body: &[u8]) -> Result<String, ApiError> {
    serde_json::from_slice::<ScrapeRequest>(body)
        .ok()
        .and_then(|req| req.url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(ApiError::missing_url)
}

pub async fn scrape_blog<F: PageFetcher>(
    State(state): State<Arc<AppState<F>>>, body: Bytes,
) -> Result<Json<ScrapeResult>, ApiError> {
    let url = parse_request(&body).inspect_err(|_| warn!("rejected request without url"))?;

    if let Err(e) = validate_source_url(&url, &state.fetch) {
        return match e {
            PagecutError::DomainNotAllowed { .. } | PagecutError::InvalidUrl(_) => {
                warn!(url = %url, error = %e, "rejected url");
                Err(ApiError::domain_not_allowed(&state.fetch.allowed_domains))
            }
            other => Err(other.into()),
        };
    }

    let html = state.fetcher.fetch(&url, &state.fetch).await?;
    let result = extract_blocking(Arc::clone(&state), html).await?.inspect_err(|e| {
        if matches!(e, PagecutError::ContentNotFound) {
            warn!(url = %url, "no content container found");
        }
    })?;

    info!(url = %url, images = result.images.len(), "scraped page");
    Ok(Json(result))
}

/// Runs the extractor on the blocking pool. A panic there is resumed on the
/// handler task so the router's panic layer reports it.
async fn extract_blocking<F: PageFetcher>(
    state: Arc<AppState<F>>, html: String,
) -> Result<pagecut_core::Result<ScrapeResult>, ApiError> {
    match tokio::task::spawn_blocking(move || state.extractor.extract(&html)).await {
        Ok(result) => Ok(result),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
