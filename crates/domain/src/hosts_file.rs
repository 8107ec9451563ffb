//! Hosts-file tokenizer.
//!
//! Line oriented. Blank lines and `#` comments are ignored, fields are
//! whitespace separated. The first field is either a literal IPv4/IPv6
//! address or an `@`-prefixed alias target; every remaining field is an
//! owner name resolving to it:
//!
//! ```text
//! 123.45.67.89          host1 host1.lan   # inline comment
//! 2606:4700:4700::1001  one.one.one.one
//! @host1                hostv4
//! ```

use std::net::IpAddr;
use std::sync::Arc;

use crate::host_entry::{to_fqdn, HostEntry};

/// One `name -> entry` association, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsRecord {
    pub name: Arc<str>,
    pub entry: HostEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHosts {
    pub records: Vec<HostsRecord>,
    /// 1-based numbers of lines whose first field was neither an address
    /// nor an alias.
    pub invalid_lines: Vec<usize>,
}

impl ParsedHosts {
    pub fn extend(&mut self, other: ParsedHosts) {
        self.records.extend(other.records);
        self.invalid_lines.extend(other.invalid_lines);
    }
}

pub fn parse_hosts(contents: &str) -> ParsedHosts {
    let mut parsed = ParsedHosts::default();

    for (idx, raw_line) in contents.lines().enumerate() {
        let line = match raw_line.find('#') {
            Some(comment_start) => &raw_line[..comment_start],
            None => raw_line,
        };

        let mut fields = line.split_whitespace();
        let Some(first) = fields.next() else {
            continue;
        };
        let names: Vec<&str> = fields.collect();
        if names.is_empty() {
            continue;
        }

        let entry = match parse_target(first) {
            Some(entry) => entry,
            None => {
                parsed.invalid_lines.push(idx + 1);
                continue;
            }
        };

        for name in names {
            parsed.records.push(HostsRecord {
                name: to_fqdn(name).into(),
                entry: entry.clone(),
            });
        }
    }

    parsed
}

fn parse_target(field: &str) -> Option<HostEntry> {
    if let Some(target) = field.strip_prefix('@') {
        if target.trim_end_matches('.').is_empty() {
            return None;
        }
        return Some(HostEntry::Alias(to_fqdn(target).into()));
    }

    field
        .parse::<IpAddr>()
        .ok()
        .map(|ip| HostEntry::Address(ip.to_canonical()))
}
