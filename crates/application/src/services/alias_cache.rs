use dashmap::DashMap;
use hickory_proto::rr::{Record, RecordType};
use hostsdns_domain::DomainError;
use rustc_hash::FxBuildHasher;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasCacheKey {
    pub record_type: RecordType,
    pub target: Arc<str>,
}

impl AliasCacheKey {
    pub fn new(record_type: RecordType, target: &str) -> Self {
        Self {
            record_type,
            target: Arc::from(target),
        }
    }
}

struct AliasCacheEntry {
    answers: Arc<[Record]>,
    fetched_at: Instant,
}

type InflightSender = Arc<watch::Sender<Option<Arc<[Record]>>>>;
type InflightMap = DashMap<AliasCacheKey, InflightSender, FxBuildHasher>;

struct InflightLeaderGuard {
    inflight: Arc<InflightMap>,
    key: AliasCacheKey,
}

impl Drop for InflightLeaderGuard {
    fn drop(&mut self) {
        if let Some((_, tx)) = self.inflight.remove(&self.key) {
            let _ = tx.send(None);
        }
    }
}

/// TTL-bounded cache of answers for alias targets.
///
/// Keyed by `(record type, target name)`. Entries are fresh while
/// `now - fetched_at < ttl`. At `max_entries` the cache sweeps expired
/// entries on insert and then evicts the oldest one. Concurrent cold
/// lookups of one key share a single fetch; failures are never cached.
pub struct AliasCache {
    entries: DashMap<AliasCacheKey, AliasCacheEntry, FxBuildHasher>,
    inflight: Arc<InflightMap>,
    ttl: Duration,
    max_entries: usize,
}

impl AliasCache {
    pub fn new(ttl_secs: u32, max_entries: usize) -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            inflight: Arc::new(DashMap::with_hasher(FxBuildHasher)),
            ttl: Duration::from_secs(u64::from(ttl_secs)),
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh answers for `(record_type, target)`, fetching them on a miss.
    ///
    /// Callers racing on the same cold key wait for the first one's fetch
    /// instead of issuing their own.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        record_type: RecordType,
        target: &str,
        fetch: F,
    ) -> Result<Arc<[Record]>, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Record>, DomainError>>,
    {
        check_record_type(record_type)?;
        let key = AliasCacheKey::new(record_type, target);

        loop {
            if let Some(answers) = self.get_fresh(&key) {
                return Ok(answers);
            }

            let (is_leader, rx) = self.register_or_join_inflight(&key);
            if is_leader {
                return self.fetch_as_leader(key, fetch).await;
            }

            if let Some(answers) = Self::wait_for_leader(rx).await {
                return Ok(answers);
            }
            debug!(alias = %key.target, "Alias fetch leader failed, retrying");
        }
    }

    fn get_fresh(&self, key: &AliasCacheKey) -> Option<Arc<[Record]>> {
        let entry = self.entries.get(key)?;
        if entry.fetched_at.elapsed() < self.ttl {
            debug!(
                alias = %key.target,
                record_type = %key.record_type,
                "Alias cache HIT"
            );
            Some(Arc::clone(&entry.answers))
        } else {
            None
        }
    }

    fn store(&self, key: AliasCacheKey, answers: Arc<[Record]>) {
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.evict();
        }

        self.entries.insert(
            key,
            AliasCacheEntry {
                answers,
                fetched_at: Instant::now(),
            },
        );
    }

    fn evict(&self) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| entry.fetched_at.elapsed() < ttl);

        if self.entries.len() < self.max_entries {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.fetched_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            debug!(alias = %key.target, "Alias cache full, evicting oldest entry");
            self.entries.remove(&key);
        }
    }

    fn register_or_join_inflight(
        &self,
        key: &AliasCacheKey,
    ) -> (bool, watch::Receiver<Option<Arc<[Record]>>>) {
        match self.inflight.entry(key.clone()) {
            dashmap::Entry::Occupied(e) => {
                let rx = e.get().subscribe();
                drop(e);
                (false, rx)
            }
            dashmap::Entry::Vacant(e) => {
                let (tx, rx) = watch::channel(None::<Arc<[Record]>>);
                e.insert(Arc::new(tx));
                (true, rx)
            }
        }
    }

    async fn wait_for_leader(
        mut rx: watch::Receiver<Option<Arc<[Record]>>>,
    ) -> Option<Arc<[Record]>> {
        let _ = rx.changed().await;
        let result = rx.borrow().clone();
        result
    }

    async fn fetch_as_leader<F, Fut>(
        &self,
        key: AliasCacheKey,
        fetch: F,
    ) -> Result<Arc<[Record]>, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Record>, DomainError>>,
    {
        debug!(
            alias = %key.target,
            record_type = %key.record_type,
            "Alias cache MISS"
        );

        let guard = InflightLeaderGuard {
            inflight: Arc::clone(&self.inflight),
            key: key.clone(),
        };

        let result = fetch().await.map(Arc::<[Record]>::from);

        if let Ok(answers) = &result {
            self.store(key.clone(), Arc::clone(answers));
            if let Some((_, tx)) = self.inflight.remove(&key) {
                let _ = tx.send(Some(Arc::clone(answers)));
            }
        }

        drop(guard);
        result
    }
}

fn check_record_type(record_type: RecordType) -> Result<(), DomainError> {
    match record_type {
        RecordType::A | RecordType::AAAA => Ok(()),
        other => Err(DomainError::UnsupportedRecordType(other.to_string())),
    }
}
