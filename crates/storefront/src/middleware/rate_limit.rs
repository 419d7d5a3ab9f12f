//! Rate limiting for form submissions using governor and `tower_governor`.
//!
//! Contact messages and testimonials are forwarded to the kitchen API, so
//! they get a per-IP limit to keep the site from relaying spam.
//!
//! The client IP is the socket peer address. `X-Forwarded-For` is only read
//! when the peer is one of the configured trusted proxies, and then only the
//! rightmost hop not added by a trusted proxy counts. Anything to the left of
//! that hop was written by the client and can't be trusted.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that uses the peer address, looking through trusted proxies.
#[derive(Clone, Debug, Default)]
pub struct ClientIpKeyExtractor {
    trusted_proxies: Arc<[IpAddr]>,
}

impl ClientIpKeyExtractor {
    /// Extractor that reads `X-Forwarded-For` only from `trusted_proxies`.
    #[must_use]
    pub fn new(trusted_proxies: &[IpAddr]) -> Self {
        Self {
            trusted_proxies: trusted_proxies.into(),
        }
    }

    fn is_trusted(&self, ip: &IpAddr) -> bool {
        self.trusted_proxies.contains(ip)
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)?;

        if !self.is_trusted(&peer) {
            return Ok(peer);
        }

        // Walk the chain from the nearest hop, skipping our own proxies
        let forwarded = req
            .headers()
            .get_all("x-forwarded-for")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .collect::<Vec<_>>();

        let client = forwarded
            .iter()
            .rev()
            .map_while(|hop| hop.parse::<IpAddr>().ok())
            .find(|ip| !self.is_trusted(ip));

        Ok(client.unwrap_or(peer))
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for form submissions: ~20 requests per minute per IP.
///
/// Configuration: 1 request every 3 seconds (replenish), burst of 10.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(3)` and `burst_size(10)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn form_rate_limiter(trusted_proxies: &[IpAddr]) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trusted_proxies))
        .per_second(3)
        .burst_size(10)
        .finish()
        .expect("rate limiter config with per_second(3) and burst_size(10) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    const PROXY: [u8; 4] = [10, 0, 0, 2];

    fn request(peer: [u8; 4], forwarded_for: Option<&str>) -> Request<()> {
        let mut builder = Request::builder()
            .uri("/contact")
            .extension(ConnectInfo(SocketAddr::from((peer, 40_000))));
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        builder.body(()).unwrap()
    }

    fn key(extractor: &ClientIpKeyExtractor, req: &Request<()>) -> String {
        extractor.extract(req).unwrap().to_string()
    }

    #[test]
    fn test_direct_client_ignores_forwarded_headers() {
        let extractor = ClientIpKeyExtractor::default();
        let mut req = request([203, 0, 113, 7], Some("1.2.3.4"));
        req.headers_mut()
            .insert("x-real-ip", "5.6.7.8".parse().unwrap());

        assert_eq!(key(&extractor, &req), "203.0.113.7");
    }

    #[test]
    fn test_untrusted_peer_cannot_spoof_through_proxy_list() {
        let extractor = ClientIpKeyExtractor::new(&[IpAddr::from(PROXY)]);
        let req = request([203, 0, 113, 7], Some("1.2.3.4"));

        assert_eq!(key(&extractor, &req), "203.0.113.7");
    }

    #[test]
    fn test_trusted_proxy_uses_last_hop() {
        let extractor = ClientIpKeyExtractor::new(&[IpAddr::from(PROXY)]);

        // The client prepended a fake hop; the proxy appended the real one
        let req = request(PROXY, Some("1.2.3.4, 198.51.100.9"));
        assert_eq!(key(&extractor, &req), "198.51.100.9");

        let req = request(PROXY, Some("198.51.100.9, 10.0.0.2"));
        assert_eq!(key(&extractor, &req), "198.51.100.9");
    }

    #[test]
    fn test_trusted_proxy_without_header_keys_on_proxy() {
        let extractor = ClientIpKeyExtractor::new(&[IpAddr::from(PROXY)]);

        assert_eq!(key(&extractor, &request(PROXY, None)), "10.0.0.2");
        assert_eq!(key(&extractor, &request(PROXY, Some("garbage"))), "10.0.0.2");
    }

    #[test]
    fn test_missing_peer_address_is_an_error() {
        let extractor = ClientIpKeyExtractor::default();
        let req = Request::builder().body(()).unwrap();

        assert!(extractor.extract(&req).is_err());
    }
}
