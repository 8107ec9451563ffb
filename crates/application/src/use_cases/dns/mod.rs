pub mod handle_dns_query;
pub mod resolve_query;

pub use handle_dns_query::{DnsReply, HandleDnsQueryUseCase, QueryOutcome};
pub use resolve_query::{LocalResolution, ResolveQueryUseCase, MAX_ALIAS_DEPTH};
