//! Request extractors shared by handlers.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

use crate::domain::visitor::Visitor;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Builds a [`Visitor`] from `X-Forwarded-For`, the peer socket address and `Referer`.
///
/// Never rejects: missing data degrades to `"unknown"` and no referrer.
impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let peer = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|ConnectInfo(addr)| addr.ip());

        let forwarded_for = header_str(&parts.headers, X_FORWARDED_FOR);
        let referrer = referer(&parts.headers);

        Ok(Visitor::resolve(forwarded_for, peer, referrer))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// `Referer` as sent. Bytes outside visible ASCII are decoded lossily instead of
/// dropping the header.
fn referer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::REFERER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{HeaderValue, Request};

    async fn extract(request: Request<()>) -> Visitor {
        let (mut parts, _) = request.into_parts();
        Visitor::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_no_metadata_is_unknown() {
        let visitor = extract(Request::builder().uri("/abc").body(()).unwrap()).await;

        assert_eq!(visitor.address, "unknown");
        assert_eq!(visitor.referrer, None);
    }

    #[tokio::test]
    async fn test_forwarded_for_and_referer() {
        let request = Request::builder()
            .uri("/abc")
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .header("Referer", "https://news.example/post")
            .body(())
            .unwrap();

        let visitor = extract(request).await;

        assert_eq!(visitor.address, "203.0.113.7");
        assert_eq!(visitor.referrer.as_deref(), Some("https://news.example/post"));
    }

    #[tokio::test]
    async fn test_peer_address_from_connect_info() {
        let mut request = Request::builder().uri("/abc").body(()).unwrap();
        let addr: SocketAddr = "192.0.2.10:5555".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));

        assert_eq!(extract(request).await.address, "192.0.2.10");
    }

    #[tokio::test]
    async fn test_peer_address_from_mock_connect_info() {
        let mut request = Request::builder().uri("/abc").body(()).unwrap();
        let addr: SocketAddr = "192.0.2.11:5555".parse().unwrap();
        request.extensions_mut().insert(MockConnectInfo(addr));

        assert_eq!(extract(request).await.address, "192.0.2.11");
    }

    #[tokio::test]
    async fn test_empty_referer_is_none() {
        let request = Request::builder()
            .uri("/abc")
            .header("Referer", "")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await.referrer, None);
    }

    #[tokio::test]
    async fn test_referer_is_not_trimmed() {
        let request = Request::builder()
            .uri("/abc")
            .header("Referer", "https://news.example/post ")
            .body(())
            .unwrap();

        assert_eq!(
            extract(request).await.referrer.as_deref(),
            Some("https://news.example/post ")
        );
    }

    #[tokio::test]
    async fn test_referer_with_non_ascii_bytes_is_kept() {
        let value = HeaderValue::from_bytes(b"https://ex.example/caf\xe9").unwrap();
        let request = Request::builder()
            .uri("/abc")
            .header(header::REFERER, value)
            .body(())
            .unwrap();

        let referrer = extract(request).await.referrer.unwrap();
        assert!(referrer.starts_with("https://ex.example/caf"));
    }
}
