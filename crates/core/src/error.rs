//! Error types for pagecut operations.
//!
//! This module defines the main error type [`PagecutError`]. Only one variant,
//! [`PagecutError::ContentNotFound`], comes out of the extraction pipeline
//! itself; the rest belong to the layers around it (fetching, profile files,
//! serialization).
//!
//! # Example
//!
//! ```rust
//! use pagecut_core::{PagecutError, extract};
//!
//! match extract("<html><body><nav>menu</nav></body></html>") {
//!     Ok(result) => println!("{} images", result.images.len()),
//!     Err(PagecutError::ContentNotFound) => println!("unsupported layout"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pagecut operations.
#[derive(Error, Debug)]
pub enum PagecutError {
    /// Neither the primary nor the fallback content rule matched.
    ///
    /// This is an expected outcome for pages with an unsupported layout and
    /// maps to a 422 response at the HTTP boundary.
    #[error("Could not extract blog content")]
    ContentNotFound,

    /// HTTP request errors from reqwest.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The source server answered with a non-success status.
    #[error("Source responded with HTTP status {status}")]
    HttpStatus { status: u16 },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or does not use http(s).
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL host is not covered by the configured domain allow-list.
    #[error("Domain not allowed: {host}")]
    DomainNotAllowed { host: String },

    /// HTML parsing errors.
    ///
    /// Raised for invalid CSS selectors in locator rules.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    WriteError(#[from] std::io::Error),

    /// Site profile errors.
    ///
    /// Returned when a profile file is unreadable or contains an invalid directive.
    #[error("Site profile error: {0}")]
    ProfileError(String),

    /// JSON serialization of a result record failed.
    #[error("Serialization failed: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Result type alias for PagecutError.
pub type Result<T> = std::result::Result<T, PagecutError>;
