//! DTOs for link shortening endpoint.

use serde::Deserialize;
use validator::Validate;

/// Request to shorten a single URL.
///
/// Scheme and alphabet checks happen in the service; the DTO only bounds sizes.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 2048))]
    pub original_url: String,

    /// Optional custom short code.
    #[validate(length(min = 1, max = 50))]
    #[serde(default)]
    pub custom_short: Option<String>,
}
