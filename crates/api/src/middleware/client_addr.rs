//! Originating client address extractor.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use agency_core::network::parse_forwarded_for;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// The client IP of the current request, if one can be determined.
///
/// Resolution order: `X-Forwarded-For` (left-most valid entry), then
/// `X-Real-IP`, then the socket peer address from [`ConnectInfo`]. The
/// server must be started with `into_make_service_with_connect_info` for
/// the last fallback to be available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAddr(pub Option<IpAddr>);

impl ClientAddr {
    /// Resolve from headers and an optional peer address.
    pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_forwarded_for);

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<IpAddr>().ok())
        };

        ClientAddr(
            forwarded
                .or_else(real_ip)
                .or_else(|| peer.map(|addr| addr.ip())),
        )
    }
}

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientAddr::resolve(&parts.headers, peer))
    }
}
