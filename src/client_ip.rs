//! Client address extraction for request logging.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

/// The peer socket address, when the server was started with connect info.
#[derive(Debug, Clone, Copy)]
pub struct RemoteAddr(pub Option<SocketAddr>);

impl<S> FromRequestParts<S> for RemoteAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RemoteAddr(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
        ))
    }
}

/// Best-effort client IP for logs.
///
/// With `trust_forwarded_for`, the rightmost `X-Forwarded-For` entry wins,
/// which is the address seen by the single trusted proxy in front of us.
pub fn extract_client_ip(
    headers: &HeaderMap,
    remote: RemoteAddr,
    trust_forwarded_for: bool,
) -> Option<IpAddr> {
    if trust_forwarded_for {
        if let Some(ip) = extract_from_x_forwarded_for(headers) {
            return Some(ip);
        }
    }

    remote.0.map(|addr| addr.ip())
}

/// Formatted client IP, `-` when unknown.
pub fn client_ip_label(headers: &HeaderMap, remote: RemoteAddr, trust_forwarded_for: bool) -> String {
    extract_client_ip(headers, remote, trust_forwarded_for)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn extract_from_x_forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    let xff = headers.get("x-forwarded-for")?.to_str().ok()?;

    xff.rsplit(',')
        .next()
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}
