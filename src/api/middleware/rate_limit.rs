//! Rate limiting middleware using token bucket algorithm.
//!
//! Applied to the `/api` surface only; redirects and health checks are not
//! throttled.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Seconds until one spent request is given back to a client.
const REPLENISH_SECS: u64 = 2;

/// Requests a client may burst before throttling kicks in.
const BURST_SIZE: u32 = 50;

/// Creates a rate limiter keyed by the socket peer address.
///
/// # Limits
///
/// - **Burst**: 50 requests
/// - **Replenish**: one request every 2 seconds
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/links", post(create_link_handler))
///     .layer(rate_limit::layer());
/// ```
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    GovernorLayer::new(build_config(PeerIpKeyExtractor))
}

/// Same limits as [`layer`], but keyed by `X-Forwarded-For` / `X-Real-IP` /
/// `Forwarded` with a fallback to the peer address.
///
/// Only use this behind a trusted reverse proxy: clients can forge these
/// headers otherwise.
pub fn proxied_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    GovernorLayer::new(build_config(SmartIpKeyExtractor))
}

fn build_config<K: KeyExtractor>(
    extractor: K,
) -> Arc<GovernorConfig<K, NoOpMiddleware<QuantaInstant>>> {
    Arc::new(
        GovernorConfigBuilder::default()
            .per_second(REPLENISH_SECS)
            .burst_size(BURST_SIZE)
            .key_extractor(extractor)
            .finish()
            .expect("rate limit period and burst size are non-zero"),
    )
}
