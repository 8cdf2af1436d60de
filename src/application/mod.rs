//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::slug_allocator::SlugAllocator`] - Unique slug allocation with bounded retry
//! - [`services::link_service::LinkService`] - Link creation, listing, update and deletion
//! - [`services::redirect_service::RedirectService`] - Slug resolution and click queueing
//! - [`services::analytics_service::AnalyticsService`] - Per-link click analytics
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
