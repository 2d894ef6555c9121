//! Storage capability traits for the domain layer.
//!
//! The engine only ever talks to these traits; concrete backends live in
//! `crate::infrastructure::persistence` and are injected at startup.
//!
//! # Available Stores
//!
//! - [`LinkStore`] - Authoritative short code to URL mapping and click counters
//! - [`ClickStore`] - Click event log and grouped aggregations
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` under `cfg(test)`.
//! See `tests/repository_*.rs` for the PostgreSQL backends.

pub mod click_store;
pub mod link_store;

pub use click_store::{ClickStore, Counts};
pub use link_store::LinkStore;

#[cfg(test)]
pub use click_store::MockClickStore;
#[cfg(test)]
pub use link_store::MockLinkStore;
