use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use ipnet::IpNet;

use crate::state::SharedState;

const MAX_USER_AGENT_CHARS: usize = 255;

/// Where a mutating request came from: network address and client string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOrigin {
    pub ip_address: Option<IpAddr>,
    pub user_agent: String,
}

impl RequestOrigin {
    pub fn from_headers(
        headers: &HeaderMap,
        peer_addr: Option<IpAddr>,
        trusted_proxies: &[IpNet],
    ) -> Self {
        let user_agent: String = headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .chars()
            .take(MAX_USER_AGENT_CHARS)
            .collect();

        RequestOrigin {
            ip_address: extract_ip(headers, peer_addr, trusted_proxies),
            user_agent,
        }
    }
}

impl FromRequestParts<SharedState> for RequestOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        Ok(RequestOrigin::from_headers(
            &parts.headers,
            peer,
            &state.config.trusted_proxies,
        ))
    }
}

fn extract_ip(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> Option<IpAddr> {
    let peer = peer_addr?;

    // Only trust X-Forwarded-For if the direct connection is from a trusted proxy
    if trusted_proxies.iter().any(|net| net.contains(&peer)) {
        if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            // Take the first (leftmost) IP that isn't a trusted proxy
            for ip_str in xff.split(',').map(|s| s.trim()) {
                if let Ok(ip) = ip_str.parse::<IpAddr>() {
                    if !trusted_proxies.iter().any(|net| net.contains(&ip)) {
                        return Some(ip);
                    }
                }
            }
        }
    }

    Some(peer)
}
