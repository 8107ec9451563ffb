use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostsConfig {
    #[serde(default)]
    pub files: Vec<String>,

    /// TTL stamped on synthesized records, also the alias cache lifetime.
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    #[serde(default = "default_alias_cache_max_entries")]
    pub alias_cache_max_entries: usize,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            files: vec![],
            ttl: default_ttl(),
            alias_cache_max_entries: default_alias_cache_max_entries(),
        }
    }
}

fn default_ttl() -> u32 {
    10
}

fn default_alias_cache_max_entries() -> usize {
    10_000
}
