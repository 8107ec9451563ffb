use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::{Record, RecordType};
use hostsdns_application::ports::Upstream;
use hostsdns_domain::DomainError;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Upstream double that answers from a canned table and counts exchanges.
#[derive(Clone, Default)]
pub struct MockUpstream {
    answers: Arc<Mutex<HashMap<(String, RecordType), Vec<Record>>>>,
    failure: Arc<Mutex<Option<DomainError>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(Message, IpAddr)>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(self, name: &str, record_type: RecordType, records: Vec<Record>) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert((name.to_ascii_lowercase(), record_type), records);
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn fail_with(&self, error: DomainError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(Message, IpAddr)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    async fn exchange(&self, query: &Message, client_ip: IpAddr) -> Result<Message, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((query.clone(), client_ip));

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failure.lock().unwrap().clone();
        if let Some(error) = failure {
            return Err(error);
        }

        let mut response = Message::new();
        response
            .set_id(query.id())
            .set_message_type(MessageType::Response)
            .set_op_code(query.op_code())
            .set_recursion_desired(query.recursion_desired())
            .set_recursion_available(true)
            .set_response_code(ResponseCode::NoError)
            .add_queries(query.queries().iter().cloned());

        if let Some(q) = query.queries().first() {
            let key = (q.name().to_ascii().to_ascii_lowercase(), q.query_type());
            if let Some(records) = self.answers.lock().unwrap().get(&key) {
                response.add_answers(records.iter().cloned());
            }
        }

        Ok(response)
    }

    fn protocol_name(&self) -> &'static str {
        "MOCK"
    }
}
