pub mod loader;

pub use loader::{load_hosts_files, HostsLoadSummary};
