//! Business logic services for the application layer.

pub mod analytics_service;
pub mod auth_service;
pub mod link_service;
pub mod redirect_service;
pub mod slug_allocator;

pub use analytics_service::AnalyticsService;
pub use auth_service::AuthService;
pub use link_service::LinkService;
pub use redirect_service::RedirectService;
pub use slug_allocator::SlugAllocator;
