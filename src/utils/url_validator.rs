//! Original URL validation.
//!
//! URLs are stored exactly as submitted (after trimming whitespace) so that
//! deduplication by original URL compares what callers actually sent.

use url::Url;

use crate::domain::errors::LinkError;

/// Longest original URL accepted.
pub const MAX_URL_LENGTH: usize = 2048;

/// Checks that `input` is an absolute HTTP(S) URL with a host.
///
/// Rejects potentially dangerous schemes like `javascript:`, `data:` or `file:`.
///
/// # Errors
///
/// Returns [`LinkError::InvalidUrl`] describing the first failed rule.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_url(" https://example.com/a ").unwrap(), "https://example.com/a");
/// assert!(validate_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<String, LinkError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(LinkError::InvalidUrl("URL must not be empty".to_string()));
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(LinkError::InvalidUrl(format!(
            "URL exceeds {} characters",
            MAX_URL_LENGTH
        )));
    }

    let url = Url::parse(trimmed).map_err(|e| LinkError::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(LinkError::InvalidUrl(format!(
                "scheme '{}' is not allowed, use http or https",
                other
            )));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(LinkError::InvalidUrl("URL must contain a host".to_string()));
    }

    Ok(trimmed.to_string())
}
