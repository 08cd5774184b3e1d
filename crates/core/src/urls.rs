//! Image URL normalization.
//!
//! Every extraction path (image attributes, `srcset`, inline `url(...)`) runs
//! its raw candidate through [`normalize_image_url`]. The normalized string is
//! also the deduplication key, so no further canonicalization happens here.

/// Rewrites a protocol-relative `//host/...` reference to `https://host/...`.
///
/// Anything else is returned unchanged.
pub fn fix_protocol_relative(raw: &str) -> String {
    if raw.starts_with("//") { format!("https:{}", raw) } else { raw.to_string() }
}

/// Normalizes a raw URL-like string into an absolute http(s) URL.
///
/// Returns `None` for relative paths, `data:` URIs, empty strings and any
/// other scheme.
///
/// # Example
///
/// ```rust
/// use pagecut_core::urls::normalize_image_url;
///
/// assert_eq!(
///     normalize_image_url("//cdn.example.com/x.png").as_deref(),
///     Some("https://cdn.example.com/x.png")
/// );
/// assert_eq!(normalize_image_url("/local/x.png"), None);
/// ```
pub fn normalize_image_url(raw: &str) -> Option<String> {
    let fixed = fix_protocol_relative(raw);
    if fixed.starts_with("http://") || fixed.starts_with("https://") { Some(fixed) } else { None }
}
