//! Rate limiting middleware using token bucket algorithm.
//!
//! Two key extractors are supported: the socket peer address (default) and
//! [`SmartIpKeyExtractor`], which trusts `X-Forwarded-For` / `X-Real-IP` /
//! `Forwarded` and must only be used behind a trusted reverse proxy.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Token bucket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    /// Seconds to replenish one request.
    pub per_second: u64,
    pub burst_size: u32,
}

/// Public endpoints (redirects): 2 requests per second, burst of 100.
pub const PUBLIC: RatePolicy = RatePolicy {
    per_second: 2,
    burst_size: 100,
};

/// Authenticated API: 1 request per second, burst of 10.
pub const SECURE: RatePolicy = RatePolicy {
    per_second: 1,
    burst_size: 10,
};

type Layer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn layer_with<K>(key_extractor: K, policy: RatePolicy) -> Layer<K>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(policy.per_second)
            .burst_size(policy.burst_size)
            .key_extractor(key_extractor)
            .finish()
            .expect("rate policy values are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Rate limiter keyed by the socket peer address.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn peer_layer(policy: RatePolicy) -> Layer<PeerIpKeyExtractor> {
    layer_with(PeerIpKeyExtractor, policy)
}

/// Rate limiter keyed by the forwarded client address.
pub fn proxy_layer(policy: RatePolicy) -> Layer<SmartIpKeyExtractor> {
    layer_with(SmartIpKeyExtractor, policy)
}

/// Applies `policy` to every route of `router`.
///
/// # Example
///
/// ```rust,ignore
/// let api = rate_limit::apply(api_routes(), rate_limit::SECURE, config.behind_proxy);
/// ```
pub fn apply(router: Router<AppState>, policy: RatePolicy, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(proxy_layer(policy))
    } else {
        router.layer(peer_layer(policy))
    }
}
