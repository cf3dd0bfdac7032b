//! Utility functions for the CPaaS SDK
//!
//! URL path handling and log-safe string truncation.

use reqwest::Url;

use crate::error::{CpaasError, Result};

/// Append `segments` to `base`, encoding each one as a single path segment.
///
/// `/`, `?`, `#` and `%` inside a segment are percent-encoded, so a value
/// cannot add path levels or start a query. E.164 numbers keep their
/// leading `+`.
///
/// # Errors
///
/// Returns `CpaasError::InvalidPathSegment` for an empty, `.` or `..`
/// segment, which URL normalization would drop or resolve away, and
/// `CpaasError::InvalidConfig` if `base` is not a hierarchical URL.
///
/// # Example
/// ```
/// use cpaas_sdk::utils::append_path_segments;
///
/// let url = append_path_segments("https://api.example.com/cpaas", &["outbound", "+14155552671", "a/b c"])?;
/// assert_eq!(url.as_str(), "https://api.example.com/cpaas/outbound/+14155552671/a%2Fb%20c");
/// assert!(append_path_segments("https://api.example.com/cpaas", &[".."]).is_err());
/// # Ok::<(), cpaas_sdk::CpaasError>(())
/// ```
pub fn append_path_segments(base: &str, segments: &[&str]) -> Result<Url> {
    if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
        return Err(CpaasError::invalid_path_segment(*bad));
    }

    let mut url = Url::parse(base)
        .map_err(|e| CpaasError::invalid_config(format!("invalid base URL {base:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| CpaasError::invalid_config(format!("base URL {base:?} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Truncate a string for logging at a UTF-8 character boundary.
///
/// Appends "..." when anything was cut.
///
/// # Example
/// ```
/// use cpaas_sdk::utils::truncate_for_log;
///
/// assert_eq!(truncate_for_log("Status: 🔍 Active", 10), "Status: ...");
/// assert_eq!(truncate_for_log("short", 10), "short");
/// ```
#[must_use]
pub fn truncate_for_log(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut boundary = max_bytes;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }
    format!("{}...", &s[..boundary])
}
