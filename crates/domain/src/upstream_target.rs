use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use crate::DomainError;

const DEFAULT_DNS_PORT: u16 = 53;

/// Address of a classic DNS upstream, possibly still a hostname.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

/// The single upstream resolver queries are forwarded to.
///
/// Selected once at startup from the configured URL scheme: `dns://` picks
/// classic UDP, `http://` and `https://` pick DNS-over-HTTPS.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamTarget {
    Udp { addr: UpstreamAddr },
    Https { url: Arc<str> },
}

fn parse_host_port(s: &str) -> Option<(&str, Option<u16>)> {
    if let Some(rest) = s.strip_prefix('[') {
        let end = rest.find(']')?;
        let host = &rest[..end];
        let tail = &rest[end + 1..];
        if tail.is_empty() {
            return Some((host, None));
        }
        let port = tail.strip_prefix(':')?.parse::<u16>().ok()?;
        return Some((host, Some(port)));
    }

    match s.rsplit_once(':') {
        Some((host, port_str)) => {
            let port = port_str.parse::<u16>().ok()?;
            Some((host, Some(port)))
        }
        None => Some((s, None)),
    }
}

fn parse_upstream_addr(addr_str: &str) -> Result<UpstreamAddr, DomainError> {
    let addr_str = addr_str.trim_end_matches('/');
    if let Ok(addr) = addr_str.parse::<SocketAddr>() {
        return Ok(UpstreamAddr::Resolved(addr));
    }

    let (host, port) = parse_host_port(addr_str)
        .filter(|(host, _)| !host.is_empty())
        .ok_or_else(|| DomainError::InvalidUpstream(format!("Invalid address '{}'", addr_str)))?;
    let port = port.unwrap_or(DEFAULT_DNS_PORT);

    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, port)));
    }

    Ok(UpstreamAddr::Unresolved {
        hostname: host.into(),
        port,
    })
}

impl FromStr for UpstreamTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(addr_str) = s.strip_prefix("dns://") {
            let addr = parse_upstream_addr(addr_str)?;
            return Ok(UpstreamTarget::Udp { addr });
        }
        if let Some(rest) = s
            .strip_prefix("https://")
            .or_else(|| s.strip_prefix("http://"))
        {
            if rest.split('/').next().unwrap_or_default().is_empty() {
                return Err(DomainError::InvalidUpstream(format!(
                    "Missing host in upstream URL '{}'",
                    s
                )));
            }
            return Ok(UpstreamTarget::Https { url: s.into() });
        }
        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(UpstreamTarget::Udp {
                addr: UpstreamAddr::Resolved(addr),
            });
        }
        Err(DomainError::InvalidUpstream(format!(
            "Invalid upstream '{}'. Expected dns://HOST[:PORT], http(s)://URL, or IP:PORT",
            s
        )))
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamTarget::Udp { addr } => write!(f, "dns://{}", addr),
            UpstreamTarget::Https { url } => write!(f, "{}", url),
        }
    }
}
