pub mod dns;

pub use dns::{
    DnsReply, HandleDnsQueryUseCase, LocalResolution, QueryOutcome, ResolveQueryUseCase,
    MAX_ALIAS_DEPTH,
};
