//! Rate limiting middleware using governor and `tower_governor`.
//!
//! `/api` routes allow about 30 requests per minute per client IP: one
//! token every 2 seconds with a burst of 30.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Proxy headers consulted for the real client IP, in order.
const CLIENT_IP_HEADERS: &[&str] = &[
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-real-ip",
    "fly-client-ip",
];

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that trusts common proxy headers and otherwise uses the
/// socket peer address.
///
/// The peer address is only available when the server is run with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        // X-Forwarded-For carries a chain; the client is the first hop
        for name in CLIENT_IP_HEADERS {
            if let Some(ip) = headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
            {
                return Ok(ip);
            }
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for `/api`: ~30 requests per minute per IP.
///
/// Returns `None` if governor rejects the quota, which only happens for a
/// zero period or burst.
#[must_use]
pub fn api_rate_limiter() -> Option<RateLimiterLayer> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(2) // Replenish 1 token every 2 seconds (30/minute)
        .burst_size(30)
        .finish()?;
    Some(GovernorLayer::new(Arc::new(config)))
}
