#![allow(dead_code, unused_imports)]

mod dns_server_mock;
mod doh_server_mock;

pub use dns_server_mock::{MockDnsServer, UdpMockMode};
pub use doh_server_mock::{DohMockMode, MockDohServer};

use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::{IpAddr, Ipv4Addr};

pub const CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100));

pub const MOCK_ANSWER: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

pub fn query_message(id: u16, name: &str, record_type: RecordType) -> Message {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(Name::from_ascii(name).unwrap(), record_type));
    message
}

/// Reply to `query` carrying one A record for [`MOCK_ANSWER`], with the
/// transaction ID shifted by `id_offset`.
pub fn mock_response(query: &Message, id_offset: u16) -> Message {
    let mut response = Message::new();
    response
        .set_id(query.id().wrapping_add(id_offset))
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(query.recursion_desired())
        .set_recursion_available(true)
        .set_response_code(ResponseCode::NoError)
        .add_queries(query.queries().iter().cloned());

    if let Some(q) = query.queries().first() {
        if q.query_type() == RecordType::A {
            response.add_answer(Record::from_rdata(
                q.name().clone(),
                60,
                RData::A(A(MOCK_ANSWER)),
            ));
        }
    }
    response
}
