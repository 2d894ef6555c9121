//! Query parameters for link listing and search.

use serde::Deserialize;
use validator::Validate;

/// Default page size for listing and search.
pub const DEFAULT_LIMIT: i64 = 20;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LinksQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

/// Exactly one of `code` and `url` must be set.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, max = 50))]
    pub code: Option<String>,

    #[validate(length(min = 1, max = 2048))]
    pub url: Option<String>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}
