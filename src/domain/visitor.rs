//! Request metadata describing who followed a short link.

use std::net::IpAddr;

/// Address reported when neither a forwarded header nor a socket address is available.
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// Client details captured on the redirect path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor {
    /// Best-effort client address; never empty.
    pub address: String,
    /// `Referer` header, verbatim.
    pub referrer: Option<String>,
}

impl Visitor {
    /// Derives the client address.
    ///
    /// Priority:
    /// 1. First entry of `X-Forwarded-For`
    /// 2. Peer socket address
    /// 3. [`UNKNOWN_ADDRESS`]
    pub fn resolve(
        forwarded_for: Option<&str>,
        peer: Option<IpAddr>,
        referrer: Option<String>,
    ) -> Self {
        let forwarded = forwarded_for
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty());

        let address = match (forwarded, peer) {
            (Some(first), _) => first.to_string(),
            (None, Some(ip)) => ip.to_string(),
            (None, None) => UNKNOWN_ADDRESS.to_string(),
        };

        Self { address, referrer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_for_first_entry_wins() {
        let peer: IpAddr = "10.0.0.1".parse().unwrap();
        let visitor = Visitor::resolve(Some("203.0.113.7, 10.0.0.2"), Some(peer), None);
        assert_eq!(visitor.address, "203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_peer() {
        let peer: IpAddr = "192.168.1.20".parse().unwrap();
        let visitor = Visitor::resolve(None, Some(peer), None);
        assert_eq!(visitor.address, "192.168.1.20");
    }

    #[test]
    fn test_blank_forwarded_header_falls_back_to_peer() {
        let peer: IpAddr = "::1".parse().unwrap();
        let visitor = Visitor::resolve(Some(" , 1.1.1.1"), Some(peer), None);
        assert_eq!(visitor.address, "::1");
    }

    #[test]
    fn test_unknown_without_any_source() {
        let visitor = Visitor::resolve(None, None, Some("https://news.ycombinator.com".into()));
        assert_eq!(visitor.address, UNKNOWN_ADDRESS);
        assert_eq!(
            visitor.referrer.as_deref(),
            Some("https://news.ycombinator.com")
        );
    }
}
