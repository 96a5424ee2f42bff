//! Extractors for who is asking and on which host.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderName;
use axum::http::header::{REFERER, USER_AGENT};
use axum::http::request::Parts;

use crate::domain::entities::ClientInfo;
use crate::state::AppState;
use crate::utils::extract_domain::{client_ip, request_host};

/// Click metadata for the current request.
#[derive(Debug, Clone)]
pub struct Client(pub ClientInfo);

impl FromRequestParts<AppState> for Client {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let header = |name: HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(Client(ClientInfo {
            ip_address: client_ip(&parts.headers, peer, state.settings.behind_proxy),
            user_agent: header(USER_AGENT),
            referrer: header(REFERER),
        }))
    }
}

/// Lower-cased request host without port, if the request named one.
#[derive(Debug, Clone)]
pub struct RequestHost(pub Option<String>);

impl FromRequestParts<AppState> for RequestHost {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestHost(request_host(
            &parts.headers,
            state.settings.behind_proxy,
        )))
    }
}
