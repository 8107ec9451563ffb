//! In-memory local overrides.
//!
//! Built once at startup, read-only afterwards. All names are stored in the
//! lowercase trailing-dot form produced by [`to_fqdn`].

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::host_entry::{reverse_name, to_fqdn, HostEntry};
use crate::hosts_file::HostsRecord;

/// Reverse-lookup name to owning forward name.
///
/// When several names share an address the first one registered keeps the
/// reverse entry.
#[derive(Debug, Clone, Default)]
pub struct ReverseIndex {
    owners: FxHashMap<Arc<str>, Arc<str>>,
}

impl ReverseIndex {
    fn register(&mut self, reverse: String, owner: &Arc<str>) {
        self.owners
            .entry(Arc::from(reverse))
            .or_insert_with(|| Arc::clone(owner));
    }

    pub fn lookup(&self, reverse_name: &str) -> Option<&str> {
        self.owners
            .get(to_fqdn(reverse_name).as_str())
            .map(|owner| owner.as_ref())
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    entries: FxHashMap<Arc<str>, Vec<HostEntry>>,
    reverse: ReverseIndex,
    record_count: usize,
}

impl RecordStore {
    /// Builds the store and its reverse index from records in declaration
    /// order. Records for the same name accumulate; nothing is overwritten.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = HostsRecord>,
    {
        let mut store = Self::default();

        for HostsRecord { name, entry } in records {
            let name: Arc<str> = to_fqdn(&name).into();

            if let HostEntry::Address(ip) = &entry {
                store.reverse.register(reverse_name(*ip), &name);
            }

            store.entries.entry(name).or_default().push(entry);
            store.record_count += 1;
        }

        store
    }

    /// Entries for `name` in insertion order; empty when unknown.
    pub fn lookup(&self, name: &str) -> &[HostEntry] {
        self.entries
            .get(to_fqdn(name).as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn reverse_lookup(&self, reverse_name: &str) -> Option<&str> {
        self.reverse.lookup(reverse_name)
    }

    pub fn reverse_index(&self) -> &ReverseIndex {
        &self.reverse
    }

    /// Number of distinct owner names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of entries across all names.
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}
