use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;

use crate::state::AppState;

/// Where a request came from, as far as it can be told.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    /// The client address: forwarded when proxies are trusted, else the peer.
    pub ip: Option<String>,
    /// `X-Forwarded-Proto`, when proxies are trusted.
    pub forwarded_proto: Option<String>,
    /// `X-Forwarded-Host`, when proxies are trusted.
    pub forwarded_host: Option<String>,
}

impl ClientInfo {
    /// Resolves the client from request headers and the socket peer.
    pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let peer_ip = peer.map(|addr| addr.ip().to_string());

        if !trust_proxy {
            return Self {
                ip: peer_ip,
                ..Self::default()
            };
        }

        let forwarded_for = header("x-forwarded-for").and_then(|list| {
            list.split(',')
                .next()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        });

        Self {
            ip: forwarded_for.or_else(|| header("x-real-ip")).or(peer_ip),
            forwarded_proto: header("x-forwarded-proto"),
            forwarded_host: header("x-forwarded-host"),
        }
    }
}

impl fmt::Display for ClientInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ip.as_deref().unwrap_or("unknown"))
    }
}

impl FromRequestParts<AppState> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0);

        Ok(ClientInfo::resolve(
            &parts.headers,
            peer,
            state.config.trust_proxy,
        ))
    }
}
