//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Link`] - A slug → destination mapping
//! - [`Click`] - A recorded visit of a link
//! - [`Caller`] - Identity claims of an authenticated caller
//!
//! Creation inputs live in separate structs (`NewLink`, `NewClick`).

pub mod caller;
pub mod click;
pub mod link;

pub use caller::{Caller, Role};
pub use click::{Click, NewClick};
pub use link::{Link, LinkFilter, LinkSummary, NewLink};
