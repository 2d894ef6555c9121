//! Store implementations.
//!
//! Concrete implementations of the domain storage traits.
//!
//! # Stores
//!
//! - [`PgLinkStore`] - Link storage and retrieval (PostgreSQL)
//! - [`PgClickStore`] - Click events and grouped counts (PostgreSQL)
//! - [`MemoryStore`] - Both traits in process memory

pub mod memory_store;
pub mod pg_click_store;
pub mod pg_link_store;

pub use memory_store::MemoryStore;
pub use pg_click_store::PgClickStore;
pub use pg_link_store::PgLinkStore;

/// Builds a `LIKE`/`ILIKE` pattern matching `query` anywhere, with `\`, `%`
/// and `_` in the query taken literally.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
