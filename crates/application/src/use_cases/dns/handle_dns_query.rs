use super::resolve_query::ResolveQueryUseCase;
use crate::ports::Upstream;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Terminal state a query ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Opcode other than QUERY; echoed back without processing.
    Passthrough,
    LocallyAnswered,
    Forwarded,
    /// Nothing local and recursion not desired.
    Refused,
    Failed,
}

impl QueryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryOutcome::Passthrough => "PASSTHROUGH",
            QueryOutcome::LocallyAnswered => "LOCAL",
            QueryOutcome::Forwarded => "FORWARDED",
            QueryOutcome::Refused => "NXDOMAIN",
            QueryOutcome::Failed => "SERVFAIL",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DnsReply {
    pub message: Message,
    pub outcome: QueryOutcome,
}

pub struct HandleDnsQueryUseCase {
    resolver: Arc<ResolveQueryUseCase>,
    upstream: Arc<dyn Upstream>,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<ResolveQueryUseCase>, upstream: Arc<dyn Upstream>) -> Self {
        Self { resolver, upstream }
    }

    pub async fn execute(&self, request: &Message, client_ip: IpAddr) -> DnsReply {
        let start = Instant::now();
        let mut reply = reply_skeleton(request);

        if request.op_code() != OpCode::Query {
            debug!(op_code = ?request.op_code(), client = %client_ip, "Passing through non-query opcode");
            return DnsReply {
                message: reply,
                outcome: QueryOutcome::Passthrough,
            };
        }

        let local = match self.resolver.execute(request.queries(), client_ip).await {
            Ok(local) => local,
            Err(e) => {
                warn!(error = %e, client = %client_ip, "Local resolution failed");
                reply.set_response_code(ResponseCode::ServFail);
                return finish(reply, QueryOutcome::Failed, request, start);
            }
        };

        if local.handled {
            reply.set_response_code(ResponseCode::NoError);
            reply.add_answers(local.answers);
            return finish(reply, QueryOutcome::LocallyAnswered, request, start);
        }

        if !request.recursion_desired() {
            reply.set_response_code(ResponseCode::NXDomain);
            return finish(reply, QueryOutcome::Refused, request, start);
        }

        match self.upstream.exchange(request, client_ip).await {
            Ok(mut response) => {
                response.set_message_type(MessageType::Response);
                finish(response, QueryOutcome::Forwarded, request, start)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    protocol = self.upstream.protocol_name(),
                    client = %client_ip,
                    "Upstream exchange failed"
                );
                reply.set_response_code(ResponseCode::ServFail);
                finish(reply, QueryOutcome::Failed, request, start)
            }
        }
    }
}

/// Response header mirroring the request, with no answers yet.
fn reply_skeleton(request: &Message) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_checking_disabled(request.checking_disabled())
        .set_recursion_available(true)
        .add_queries(request.queries().iter().cloned());
    reply
}

fn finish(message: Message, outcome: QueryOutcome, request: &Message, start: Instant) -> DnsReply {
    if let Some(query) = request.queries().first() {
        debug!(
            domain = %query.name(),
            record_type = %query.query_type(),
            outcome = outcome.as_str(),
            answers = message.answers().len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Query handled"
        );
    }
    DnsReply { message, outcome }
}
