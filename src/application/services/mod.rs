//! Business logic services for the application layer.

pub mod analytics_service;
pub mod link_service;
pub mod stats_service;

pub use analytics_service::AnalyticsService;
pub use link_service::{EngineOptions, LinkService};
pub use stats_service::{AnalyticsReport, StatsService};
