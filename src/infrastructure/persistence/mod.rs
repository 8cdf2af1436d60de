//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries with bound parameters.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, search and slug existence checks
//! - [`PgClickRepository`] - Append-only click log
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_token_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
