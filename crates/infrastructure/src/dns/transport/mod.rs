#[cfg(feature = "dns-over-https")]
pub mod https;
pub mod resolver;
pub mod udp;

use async_trait::async_trait;
use hickory_proto::op::Message;
use hostsdns_application::ports::Upstream;
use hostsdns_domain::{DomainError, UpstreamTarget};
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

/// Moves one encoded DNS message to the upstream and back.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        client_ip: IpAddr,
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    #[cfg(feature = "dns-over-https")]
    Https(https::HttpsTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        client_ip: IpAddr,
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, client_ip, timeout).await,
            #[cfg(feature = "dns-over-https")]
            Self::Https(t) => DnsTransport::send(t, message_bytes, client_ip, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            #[cfg(feature = "dns-over-https")]
            Self::Https(_) => "HTTPS",
        }
    }

    pub fn server(&self) -> String {
        match self {
            Self::Udp(t) => t.server_addr().to_string(),
            #[cfg(feature = "dns-over-https")]
            Self::Https(t) => t.url().to_string(),
        }
    }
}

/// The configured upstream, selected once at startup.
///
/// Encodes the query, ships it over the transport, decodes the reply and
/// rejects replies whose transaction ID differs from the query's.
pub struct UpstreamTransport {
    transport: Transport,
    timeout: Duration,
}

impl UpstreamTransport {
    pub fn new(transport: Transport, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

#[async_trait]
impl Upstream for UpstreamTransport {
    async fn exchange(&self, query: &Message, client_ip: IpAddr) -> Result<Message, DomainError> {
        let request_bytes = query.to_vec().map_err(|e| DomainError::UpstreamTransport {
            server: self.transport.server(),
            reason: format!("failed to encode query: {}", e),
        })?;

        let response = self
            .transport
            .send(&request_bytes, client_ip, self.timeout)
            .await?;

        let message = Message::from_vec(&response.bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!(
                "unpacking response from {}: {}",
                self.transport.server(),
                e
            ))
        })?;

        if message.id() != query.id() {
            return Err(DomainError::TransactionIdMismatch {
                expected: query.id(),
                received: message.id(),
            });
        }

        debug!(
            protocol = response.protocol_used,
            answers = message.answers().len(),
            rcode = ?message.response_code(),
            "Upstream exchange complete"
        );

        Ok(message)
    }

    fn protocol_name(&self) -> &'static str {
        self.transport.protocol_name()
    }
}

/// Builds the transport for `target`, resolving a `dns://` hostname first.
pub async fn create_transport(
    target: &UpstreamTarget,
    timeout: Duration,
) -> Result<UpstreamTransport, DomainError> {
    let transport = match target {
        UpstreamTarget::Udp { addr } => {
            let server_addr = match addr.socket_addr() {
                Some(resolved) => resolved,
                None => {
                    let (hostname, port) = addr.unresolved_parts().ok_or_else(|| {
                        DomainError::InvalidUpstream(format!("Cannot resolve {}", addr))
                    })?;
                    let resolved = resolver::resolve_first(hostname, port, timeout).await?;
                    info!(upstream = %addr, resolved = %resolved, "Resolved upstream hostname");
                    resolved
                }
            };
            Transport::Udp(udp::UdpTransport::new(server_addr))
        }

        #[cfg(feature = "dns-over-https")]
        UpstreamTarget::Https { url } => {
            Transport::Https(https::HttpsTransport::new(url, timeout)?)
        }

        #[cfg(not(feature = "dns-over-https"))]
        UpstreamTarget::Https { url } => {
            return Err(DomainError::InvalidUpstream(format!(
                "HTTPS feature not enabled. Enable 'dns-over-https' feature to use: {}",
                url
            )))
        }
    };

    Ok(UpstreamTransport::new(transport, timeout))
}
