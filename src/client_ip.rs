use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::rate_limit::UNATTRIBUTED_CLIENT;
use crate::state::AppState;

// key the throttle buckets a request under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequestParts<Arc<AppState>> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(resolve(&parts.headers, peer, state.trust_proxy))
    }
}

// Leftmost X-Forwarded-For entry when behind a trusted proxy, else the peer
pub fn resolve(headers: &HeaderMap, peer: Option<IpAddr>, trust_proxy: bool) -> ClientIp {
    let forwarded = trust_proxy.then(|| forwarded_for(headers)).flatten();
    let ip = forwarded
        .or(peer)
        .map_or_else(|| UNATTRIBUTED_CLIENT.to_string(), |ip| ip.to_string());
    ClientIp(ip)
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(xff: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(xff).unwrap());
        headers
    }

    #[test]
    fn peer_address_without_proxy_trust() {
        let peer: IpAddr = "10.0.0.7".parse().unwrap();
        let ip = resolve(&headers("1.2.3.4"), Some(peer), false);
        assert_eq!(ip.as_str(), "10.0.0.7");
    }

    #[test]
    fn leftmost_forwarded_address_when_trusted() {
        let peer: IpAddr = "10.0.0.7".parse().unwrap();
        let ip = resolve(&headers("1.2.3.4, 172.16.0.1"), Some(peer), true);
        assert_eq!(ip.as_str(), "1.2.3.4");
    }

    #[test]
    fn garbage_forwarded_header_falls_back_to_peer() {
        let peer: IpAddr = "::1".parse().unwrap();
        let ip = resolve(&headers("not-an-ip"), Some(peer), true);
        assert_eq!(ip.as_str(), "::1");
    }

    #[test]
    fn nothing_resolvable_is_unattributed() {
        let ip = resolve(&HeaderMap::new(), None, true);
        assert_eq!(ip.as_str(), UNATTRIBUTED_CLIENT);
    }
}
