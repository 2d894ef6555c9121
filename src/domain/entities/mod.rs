//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`Link`] - A short code mapped to its original URL
//! - [`Click`] - A recorded redirect through a link
//!
//! Creation inputs live in separate structs (`NewLink`, `NewClick`) because the
//! store assigns ids and timestamps.

pub mod click;
pub mod link;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink};
