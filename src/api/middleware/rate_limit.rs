//! Per-client rate limiting of the public credential endpoints.

use axum::Router;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::{AppState, Settings};

/// Seconds between replenished requests.
const REPLENISH_SECS: u64 = 2;

/// Requests a client may make before being throttled.
const BURST: u32 = 10;

/// Wraps `router` in a token-bucket limiter keyed by client IP.
///
/// # Limits
///
/// - **Burst**: 10 requests
/// - **Refill**: one request every 2 seconds
///
/// Requests over the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// With `behind_proxy` the key comes from `X-Forwarded-For` / `X-Real-IP`
/// (falling back to the peer address), otherwise from the peer socket
/// address. The router must be served with connect info.
pub fn limit_credentials(router: Router<AppState>, settings: &Settings) -> Router<AppState> {
    if !settings.rate_limit {
        return router;
    }

    if settings.behind_proxy {
        let Some(conf) = GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(REPLENISH_SECS)
            .burst_size(BURST)
            .finish()
        else {
            tracing::error!("Invalid rate limit quota; credential endpoints are not limited");
            return router;
        };
        router.layer(GovernorLayer::new(Arc::new(conf)))
    } else {
        let Some(conf) = GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(REPLENISH_SECS)
            .burst_size(BURST)
            .finish()
        else {
            tracing::error!("Invalid rate limit quota; credential endpoints are not limited");
            return router;
        };
        router.layer(GovernorLayer::new(Arc::new(conf)))
    }
}
