use hostsdns_application::ports::Upstream;
use hostsdns_application::services::AliasCache;
use hostsdns_application::use_cases::{HandleDnsQueryUseCase, ResolveQueryUseCase};
use hostsdns_domain::Config;
use hostsdns_infrastructure::dns::{create_transport, DnsServerHandler};
use hostsdns_infrastructure::hosts::load_hosts_files;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct DnsServices {
    pub alias_cache: Arc<AliasCache>,
    pub handler_use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let (store, summary) = load_hosts_files(&config.hosts.files).await?;
        if summary.invalid_lines > 0 {
            warn!(
                invalid_lines = summary.invalid_lines,
                "Some hosts lines were skipped"
            );
        }

        let target = config.upstream_target()?;
        let timeout = Duration::from_secs(config.upstream.timeout);
        let upstream: Arc<dyn Upstream> = Arc::new(create_transport(&target, timeout).await?);
        info!(
            upstream = %target,
            protocol = upstream.protocol_name(),
            timeout_secs = config.upstream.timeout,
            "Upstream configured"
        );

        let alias_cache = Arc::new(AliasCache::new(
            config.hosts.ttl,
            config.hosts.alias_cache_max_entries,
        ));

        let resolver = Arc::new(ResolveQueryUseCase::new(
            Arc::new(store),
            Arc::clone(&alias_cache),
            Arc::clone(&upstream),
            config.hosts.ttl,
        ));
        let handler_use_case = Arc::new(HandleDnsQueryUseCase::new(resolver, upstream));

        Ok(Self {
            alias_cache,
            handler_use_case,
        })
    }

    pub fn handler(&self) -> DnsServerHandler {
        DnsServerHandler::new(Arc::clone(&self.handler_use_case))
    }
}
