#![allow(dead_code, unused_imports)]

mod mock_upstream;

pub use mock_upstream::MockUpstream;

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use hostsdns_domain::{parse_hosts, RecordStore};
use std::net::{IpAddr, Ipv4Addr};

pub const CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100));

pub fn store_from(contents: &str) -> RecordStore {
    RecordStore::from_records(parse_hosts(contents).records)
}

pub fn query(name: &str, record_type: RecordType) -> Query {
    Query::query(Name::from_ascii(name).unwrap(), record_type)
}

pub fn request(name: &str, record_type: RecordType, recursion_desired: bool) -> Message {
    let mut message = Message::new();
    message
        .set_id(4242)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(recursion_desired)
        .add_query(query(name, record_type));
    message
}

pub fn a_record(name: &str, ip: &str, ttl: u32) -> Record {
    Record::from_rdata(
        Name::from_ascii(name).unwrap(),
        ttl,
        RData::A(hickory_proto::rr::rdata::A(ip.parse().unwrap())),
    )
}

pub fn aaaa_record(name: &str, ip: &str, ttl: u32) -> Record {
    Record::from_rdata(
        Name::from_ascii(name).unwrap(),
        ttl,
        RData::AAAA(hickory_proto::rr::rdata::AAAA(ip.parse().unwrap())),
    )
}

pub fn record_ip(record: &Record) -> Option<IpAddr> {
    match record.data() {
        RData::A(a) => Some(IpAddr::V4(a.0)),
        RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
        _ => None,
    }
}
