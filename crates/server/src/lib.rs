//! HTTP transport for pagecut.
//!
//! One route, `POST /scrape-blog`, takes `{"url": "..."}`, fetches the page
//! and answers with the extraction result record. A panic anywhere below the
//! router is answered with a 500 carrying the panic message.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use pagecut_core::Extractor;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::{AppState, HttpFetcher, PageFetcher};

/// Builds the router over any fetcher.
pub fn router<F: PageFetcher>(state: AppState<F>) -> Router {
    Router::new()
        .route("/scrape-blog", post(routes::scrape_blog::<F>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(error::panic_response)),
        )
        .with_state(Arc::new(state))
}

/// Builds the production router.
pub fn app(config: &ServerConfig) -> Router {
    router(AppState {
        extractor: Extractor::with_config(config.extract_config()),
        fetch: config.fetch_config(),
        fetcher: HttpFetcher,
    })
}
