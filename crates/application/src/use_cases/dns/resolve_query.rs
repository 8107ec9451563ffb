use crate::ports::Upstream;
use crate::services::AliasCache;
use futures::future::{BoxFuture, FutureExt};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::{A, AAAA, PTR};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use hostsdns_domain::{DomainError, HostEntry, RecordStore};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Longest alias chain followed before giving up.
pub const MAX_ALIAS_DEPTH: usize = 8;

/// Answers synthesized from local overrides for one message.
#[derive(Debug, Clone, Default)]
pub struct LocalResolution {
    pub answers: Vec<Record>,
    /// True when any question in the message was locally handled.
    pub handled: bool,
}

pub struct ResolveQueryUseCase {
    store: Arc<RecordStore>,
    alias_cache: Arc<AliasCache>,
    upstream: Arc<dyn Upstream>,
    local_ttl: u32,
}

impl ResolveQueryUseCase {
    pub fn new(
        store: Arc<RecordStore>,
        alias_cache: Arc<AliasCache>,
        upstream: Arc<dyn Upstream>,
        local_ttl: u32,
    ) -> Self {
        Self {
            store,
            alias_cache,
            upstream,
            local_ttl,
        }
    }

    pub async fn execute(
        &self,
        queries: &[Query],
        client_ip: IpAddr,
    ) -> Result<LocalResolution, DomainError> {
        self.resolve_queries(queries, client_ip, Vec::new()).await
    }

    /// `chain` holds the alias targets already being followed above this
    /// call; it is empty for a client's own questions.
    fn resolve_queries<'a>(
        &'a self,
        queries: &'a [Query],
        client_ip: IpAddr,
        chain: Vec<Arc<str>>,
    ) -> BoxFuture<'a, Result<LocalResolution, DomainError>> {
        async move {
            let mut resolution = LocalResolution::default();

            for query in queries {
                let handled = match query.query_type() {
                    RecordType::A | RecordType::AAAA => {
                        self.resolve_address(query, client_ip, &chain, &mut resolution.answers)
                            .await?
                    }
                    RecordType::PTR => self.resolve_ptr(query, &mut resolution.answers),
                    _ => false,
                };
                resolution.handled |= handled;
            }

            Ok(resolution)
        }
        .boxed()
    }

    async fn resolve_address(
        &self,
        query: &Query,
        client_ip: IpAddr,
        chain: &[Arc<str>],
        answers: &mut Vec<Record>,
    ) -> Result<bool, DomainError> {
        let query_type = query.query_type();
        let owner = query.name();
        let entries = self.store.lookup(&owner.to_ascii());

        if entries.is_empty() {
            return Ok(false);
        }

        for entry in entries {
            match entry {
                HostEntry::Address(ip) => {
                    let rdata = match (query_type, ip) {
                        (RecordType::A, IpAddr::V4(v4)) => RData::A(A(*v4)),
                        (RecordType::AAAA, IpAddr::V6(v6)) => RData::AAAA(AAAA(*v6)),
                        _ => continue,
                    };
                    answers.push(Record::from_rdata(owner.clone(), self.local_ttl, rdata));
                }
                HostEntry::Alias(target) => {
                    let start = answers.len();
                    let resolved = self
                        .resolve_alias(Arc::clone(target), query_type, client_ip, chain)
                        .await?;
                    answers.extend(resolved.iter().cloned());
                    for record in &mut answers[start..] {
                        record.set_name(owner.clone());
                    }
                }
            }
        }

        debug!(
            domain = %owner,
            record_type = %query_type,
            answers = answers.len(),
            "Answered from local overrides"
        );
        Ok(true)
    }

    fn resolve_ptr(&self, query: &Query, answers: &mut Vec<Record>) -> bool {
        let reverse = query.name().to_ascii();
        let Some(owner) = self.store.reverse_lookup(&reverse) else {
            return false;
        };

        match Name::from_ascii(owner) {
            Ok(target) => {
                answers.push(Record::from_rdata(
                    query.name().clone(),
                    self.local_ttl,
                    RData::PTR(PTR(target)),
                ));
                true
            }
            Err(e) => {
                let error = DomainError::RecordConstruction(format!("PTR {}: {}", owner, e));
                warn!(error = %error, reverse = %reverse, "Skipping local PTR record");
                false
            }
        }
    }

    async fn resolve_alias(
        &self,
        target: Arc<str>,
        record_type: RecordType,
        client_ip: IpAddr,
        chain: &[Arc<str>],
    ) -> Result<Arc<[Record]>, DomainError> {
        if chain.len() >= MAX_ALIAS_DEPTH || chain.contains(&target) {
            return Err(DomainError::AliasDepthExceeded(target.to_string()));
        }

        let mut next_chain = chain.to_vec();
        next_chain.push(Arc::clone(&target));

        // Only a client's own alias hop is cached. Its entry always holds a
        // full walk from depth zero, so a hit never shortens a longer chain.
        if !chain.is_empty() {
            return self
                .fetch_alias(target, record_type, client_ip, next_chain)
                .await
                .map(Arc::from);
        }

        let fetch_target = Arc::clone(&target);
        let fetch = move || self.fetch_alias(fetch_target, record_type, client_ip, next_chain);
        self.alias_cache
            .get_or_fetch(record_type, &target, fetch)
            .await
    }

    async fn fetch_alias(
        &self,
        target: Arc<str>,
        record_type: RecordType,
        client_ip: IpAddr,
        chain: Vec<Arc<str>>,
    ) -> Result<Vec<Record>, DomainError> {
        let name = Name::from_ascii(&*target)
            .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", target, e)))?;
        let query = Query::query(name, record_type);

        let local = self
            .resolve_queries(std::slice::from_ref(&query), client_ip, chain)
            .await?;
        if local.handled {
            return Ok(local.answers);
        }

        let mut request = Message::new();
        request
            .set_id(fastrand::u16(..))
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true)
            .add_query(query);

        debug!(
            alias = %target,
            record_type = %record_type,
            protocol = self.upstream.protocol_name(),
            "Resolving alias target upstream"
        );

        let response = self.upstream.exchange(&request, client_ip).await?;
        Ok(response.answers().to_vec())
    }
}
