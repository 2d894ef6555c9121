//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Caching backends (Redis, in-memory and no-op)
//! - [`persistence`] - PostgreSQL and in-memory store implementations

pub mod cache;
pub mod persistence;
