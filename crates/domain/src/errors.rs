use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid upstream: {0}")]
    InvalidUpstream(String),

    #[error("Unsupported record type for alias resolution: {0}")]
    UnsupportedRecordType(String),

    #[error("Alias chain too deep while resolving {0}")]
    AliasDepthExceeded(String),

    #[error("Failed to build local record: {0}")]
    RecordConstruction(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Upstream {server} unreachable: {reason}")]
    UpstreamTransport { server: String, reason: String },

    #[error("Expected status 200, got {status} from {server}")]
    UpstreamStatus { server: String, status: u16 },

    #[error("Transaction ID mismatch: sent {expected}, received {received}")]
    TransactionIdMismatch { expected: u16, received: u16 },

    #[error("Hosts file error: {0}")]
    HostsFile(String),
}

impl DomainError {
    /// Network-level failure reaching the upstream.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. } | DomainError::UpstreamTransport { .. }
        )
    }

    /// The upstream answered, but not with a usable DNS response.
    pub fn is_protocol_failure(&self) -> bool {
        matches!(
            self,
            DomainError::UpstreamStatus { .. }
                | DomainError::InvalidDnsResponse(_)
                | DomainError::TransactionIdMismatch { .. }
        )
    }
}
