use clap::Parser;
use hostsdns_domain::CliOverrides;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "hostsdns")]
#[command(version)]
#[command(about = "hostsdns - DNS forwarder with hosts-file overrides")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Upstream URL (dns://host[:port] or https://...)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// TTL for hosts file entries, in seconds
    #[arg(short = 't', long)]
    ttl: Option<u32>,

    /// Path to hosts file (repeatable)
    #[arg(short = 'H', long = "hosts", value_name = "FILE")]
    hosts: Vec<String>,

    /// Upstream timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log every query decision
    #[arg(short = 'V', long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        upstream: cli.upstream,
        upstream_timeout: cli.timeout,
        bind_address: cli.bind,
        ttl: cli.ttl,
        hosts_files: cli.hosts,
        log_level: cli.log_level,
        verbose: cli.verbose,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting hostsdns v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config).await?;
    let bind_addr = config.bind_addr()?;
    let dns_handler = dns_services.handler();

    let dns_server = tokio::spawn(server::start_dns_server(
        bind_addr,
        dns_handler,
        config.server.udp_workers,
    ));

    tokio::select! {
        result = dns_server => {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(error = %e, "DNS server error");
                    return Err(e);
                }
                Err(e) => {
                    error!(error = %e, "DNS server task failed");
                    return Err(e.into());
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!(
        alias_cache_entries = dns_services.alias_cache.len(),
        "Server shutdown complete"
    );
    Ok(())
}
