use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Number of UDP listener sockets sharing the bind address.
    #[serde(default = "default_udp_workers")]
    pub udp_workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            udp_workers: default_udp_workers(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:53".to_string()
}

fn default_udp_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
