//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating store and cache
//! calls, validation, and business rules. Services depend only on the
//! capability traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and resolution
//! - [`services::analytics_service::AnalyticsService`] - Click recording
//! - [`services::stats_service::StatsService`] - Click analytics
//! - [`click_worker`] - Bounded click queue and background worker

pub mod click_worker;
pub mod services;
