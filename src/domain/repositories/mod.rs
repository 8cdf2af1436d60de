//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link CRUD and slug existence checks
//! - [`ClickRepository`] - Append-only click log
//! - [`TokenRepository`] - API token authentication

pub mod click_repository;
pub mod link_repository;
pub mod token_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use token_repository::{ApiToken, NewApiToken, TokenRepository};

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
