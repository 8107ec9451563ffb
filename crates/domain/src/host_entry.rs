use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/// A local override for one owner name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostEntry {
    /// Answer with this literal address.
    Address(IpAddr),
    /// Answer with whatever the target name resolves to.
    Alias(Arc<str>),
}

impl HostEntry {
    pub fn address(&self) -> Option<IpAddr> {
        match self {
            HostEntry::Address(ip) => Some(*ip),
            HostEntry::Alias(_) => None,
        }
    }

    pub fn alias_target(&self) -> Option<&str> {
        match self {
            HostEntry::Alias(target) => Some(target),
            HostEntry::Address(_) => None,
        }
    }
}

impl fmt::Display for HostEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEntry::Address(ip) => write!(f, "{}", ip),
            HostEntry::Alias(target) => write!(f, "@{}", target),
        }
    }
}

/// Lowercases `name` and guarantees exactly one trailing dot.
///
/// Every name stored in or looked up against the record store goes through
/// this function first.
pub fn to_fqdn(name: &str) -> String {
    let trimmed = name.trim().trim_end_matches('.');
    let mut fqdn = String::with_capacity(trimmed.len() + 1);
    fqdn.push_str(&trimmed.to_ascii_lowercase());
    fqdn.push('.');
    fqdn
}

/// Reverse-lookup name for `ip` (`.in-addr.arpa.` or `.ip6.arpa.`).
pub fn reverse_name(ip: IpAddr) -> String {
    const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{}.{}.{}.{}.in-addr.arpa.", d, c, b, a)
        }
        IpAddr::V6(v6) => {
            let octets = v6.octets();
            let mut out = String::with_capacity(octets.len() * 4 + "ip6.arpa.".len());
            for byte in octets.iter().rev() {
                out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
                out.push('.');
                out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
                out.push('.');
            }
            out.push_str("ip6.arpa.");
            out
        }
    }
}
