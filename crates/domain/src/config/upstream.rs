use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// `dns://host[:port]` for classic UDP, `http(s)://...` for DoH.
    #[serde(default = "default_upstream_url")]
    pub url: String,

    /// Upstream exchange timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_upstream_url() -> String {
    "https://cloudflare-dns.com/dns-query".to_string()
}

fn default_timeout() -> u64 {
    5
}
