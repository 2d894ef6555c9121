//! Domain layer containing business entities and storage contracts.
//!
//! Independent of infrastructure and presentation concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Storage capability traits
//! - [`click_event`] - Redirect event queued for analytics
//! - [`errors`] - Store and link error taxonomy
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the link and replies
//! 2. A [`click_event::ClickEvent`] is pushed onto the bounded click queue
//! 3. [`crate::application::click_worker::run_click_worker`] records it off the request path
//! 4. Click data is persisted via [`repositories::ClickStore`] and the counter via [`repositories::LinkStore`]

pub mod click_event;
pub mod entities;
pub mod errors;
pub mod repositories;
