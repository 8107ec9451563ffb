use async_trait::async_trait;
use hickory_proto::op::Message;
use hostsdns_domain::DomainError;
use std::net::IpAddr;

/// The resolver unanswered queries are forwarded to.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Exchange `query` with the upstream on behalf of `client_ip`.
    ///
    /// A response whose transaction ID differs from the query's is an error,
    /// never a usable answer.
    async fn exchange(&self, query: &Message, client_ip: IpAddr) -> Result<Message, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
