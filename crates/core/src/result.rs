//! Scrape result record.
//!
//! This module defines [`ScrapeResult`], the structured output of one
//! extraction: title, sanitized HTML, image URLs and the placeholder
//! filenames paired with them.

use serde::Serialize;

use crate::Result;

/// The complete result of extracting one page.
///
/// `image_names[i]` is the synthetic filename for `images[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeResult {
    /// Title heading text, empty when the page has none.
    pub title: String,

    /// Sanitized content HTML.
    pub content_html: String,

    /// Distinct absolute image URLs in discovery order.
    pub images: Vec<String>,

    /// Placeholder filenames, one per image.
    pub image_names: Vec<String>,
}

impl ScrapeResult {
    /// Creates a result, deriving `image_names` from `images`.
    pub fn new(title: String, content_html: String, images: Vec<String>, extension: &str) -> Self {
        let image_names = synthetic_image_names(images.len(), extension);
        Self { title, content_html, images, image_names }
    }

    /// Serializes the record to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the record to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `image1.<ext>` through `image<count>.<ext>`.
///
/// The names are ordinal placeholders; they say nothing about the real file
/// type behind each URL.
pub fn synthetic_image_names(count: usize, extension: &str) -> Vec<String> {
    (1..=count).map(|i| format!("image{}.{}", i, extension)).collect()
}
