//! Destination URL validation.

use url::Url;

/// Longest destination accepted, in bytes.
pub const MAX_DESTINATION_LEN: usize = 2048;

/// Errors that can occur while validating a destination.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DestinationError {
    #[error("Destination URL is required")]
    Empty,

    #[error("Destination URL is too long (max {MAX_DESTINATION_LEN} bytes)")]
    TooLong,

    #[error("Invalid destination URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS destinations are allowed")]
    UnsupportedProtocol,

    #[error("Destination URL must include a host")]
    MissingHost,
}

/// Parses a destination and returns its serialized form.
///
/// The serialized form is what gets stored and later sent as `Location`, so it is
/// always a valid header value (non-ASCII hosts are punycoded, paths percent-encoded).
///
/// # Errors
///
/// Returns a [`DestinationError`] for empty, oversized, relative, host-less or
/// non-HTTP(S) input.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     validate_destination("https://example.org/page").unwrap(),
///     "https://example.org/page"
/// );
/// assert!(validate_destination("javascript:alert(1)").is_err());
/// ```
pub fn validate_destination(input: &str) -> Result<String, DestinationError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(DestinationError::Empty);
    }

    if input.len() > MAX_DESTINATION_LEN {
        return Err(DestinationError::TooLong);
    }

    let url = Url::parse(input).map_err(|e| DestinationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(DestinationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(DestinationError::MissingHost);
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_url_is_preserved() {
        assert_eq!(
            validate_destination("https://example.org/page").unwrap(),
            "https://example.org/page"
        );
        assert_eq!(
            validate_destination("http://example.com/a?b=c#frag").unwrap(),
            "http://example.com/a?b=c#frag"
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(
            validate_destination("  https://example.org/page \n").unwrap(),
            "https://example.org/page"
        );
    }

    #[test]
    fn test_bare_host_gets_root_path() {
        assert_eq!(
            validate_destination("https://example.org").unwrap(),
            "https://example.org/"
        );
    }

    #[test]
    fn test_non_ascii_is_encoded() {
        let url = validate_destination("https://example.org/päge").unwrap();
        assert!(url.is_ascii());
        assert_eq!(url, "https://example.org/p%C3%A4ge");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(validate_destination("   "), Err(DestinationError::Empty));
    }

    #[test]
    fn test_relative_rejected() {
        assert!(matches!(
            validate_destination("/just/a/path"),
            Err(DestinationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_destination("not-a-url"),
            Err(DestinationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_dangerous_schemes_rejected() {
        for input in ["javascript:alert(1)", "data:text/html,hi", "file:///etc/passwd"] {
            assert_eq!(
                validate_destination(input),
                Err(DestinationError::UnsupportedProtocol),
                "{input}"
            );
        }
    }

    #[test]
    fn test_too_long_rejected() {
        let long = format!("https://example.org/{}", "a".repeat(MAX_DESTINATION_LEN));
        assert_eq!(validate_destination(&long), Err(DestinationError::TooLong));
    }
}
