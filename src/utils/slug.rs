//! Slug generation and validation utilities.
//!
//! Generated slugs are drawn from a 62-symbol alphanumeric alphabet. Custom slugs
//! supplied by callers may additionally contain `-` and `_`.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;

/// Alphabet for generated slugs.
pub const SLUG_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated slugs unless configured otherwise.
pub const DEFAULT_SLUG_LENGTH: usize = 6;

pub const CUSTOM_SLUG_MIN_LEN: usize = 3;
pub const CUSTOM_SLUG_MAX_LEN: usize = 50;

/// Top-level path segments served by the router itself; a link with one of these
/// slugs could never be reached.
pub const RESERVED_SLUGS: &[&str] = &["api", "health"];

static CUSTOM_SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,50}$").expect("valid slug pattern"));

/// Source of candidate slugs for the allocator.
///
/// Injected so allocation can be tested with scripted sequences.
pub trait SlugSource: Send + Sync {
    /// Returns a fresh candidate of exactly `length` characters.
    fn next_slug(&self, length: usize) -> String;
}

/// [`SlugSource`] backed by the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSlugSource;

impl SlugSource for RandomSlugSource {
    fn next_slug(&self, length: usize) -> String {
        generate_slug(&mut rand::rng(), length)
    }
}

/// Draws `length` symbols uniformly from [`SLUG_ALPHABET`].
pub fn generate_slug<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| SLUG_ALPHABET[rng.random_range(0..SLUG_ALPHABET.len())] as char)
        .collect()
}

/// Returns true when the slug collides with a route segment.
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(slug))
}

/// Validates a caller-supplied slug against `[A-Za-z0-9_-]{3,50}`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the pattern does not match.
pub fn validate_custom_slug(slug: &str) -> Result<(), AppError> {
    if CUSTOM_SLUG_REGEX.is_match(slug) {
        return Ok(());
    }

    Err(AppError::bad_request(
        "Invalid slug. Use only letters, numbers, hyphens, and underscores (3-50 characters)",
        json!({
            "slug": slug,
            "min_length": CUSTOM_SLUG_MIN_LEN,
            "max_length": CUSTOM_SLUG_MAX_LEN,
        }),
    ))
}
