//! hostsdns domain layer
pub mod config;
pub mod errors;
pub mod host_entry;
pub mod hosts_file;
pub mod record_store;
pub mod upstream_target;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use host_entry::{reverse_name, to_fqdn, HostEntry};
pub use hosts_file::{parse_hosts, HostsRecord, ParsedHosts};
pub use record_store::{RecordStore, ReverseIndex};
pub use upstream_target::{UpstreamAddr, UpstreamTarget};
