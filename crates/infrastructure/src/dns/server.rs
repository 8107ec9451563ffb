use hickory_proto::op::Message;
use hostsdns_application::use_cases::HandleDnsQueryUseCase;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error};

/// Datagram-level entry point shared by every UDP worker.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Decodes `query_buf`, answers it and encodes the reply.
    ///
    /// Returns `None` when the datagram is not a DNS message or the reply
    /// cannot be encoded; nothing is sent back in either case. IPv4 clients
    /// seen through a dual-stack socket are unmapped before use.
    pub async fn handle_raw_udp(&self, query_buf: &[u8], client_ip: IpAddr) -> Option<Vec<u8>> {
        let client_ip = client_ip.to_canonical();
        let request = match Message::from_vec(query_buf) {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, client = %client_ip, len = query_buf.len(), "Dropping malformed query");
                return None;
            }
        };

        let reply = self.use_case.execute(&request, client_ip).await;

        match reply.message.to_vec() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(
                    error = %e,
                    client = %client_ip,
                    outcome = reply.outcome.as_str(),
                    "Failed to encode DNS response"
                );
                None
            }
        }
    }
}
