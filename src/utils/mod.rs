//! Utility functions for slug generation, URL validation, and client fingerprinting.
//!
//! - [`slug`] - Slug generation and custom slug validation
//! - [`destination`] - Destination URL validation
//! - [`fingerprint`] - Keyed hashing of client addresses

pub mod destination;
pub mod fingerprint;
pub mod slug;
