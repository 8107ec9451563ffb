use hostsdns_domain::{parse_hosts, DomainError, ParsedHosts, RecordStore};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostsLoadSummary {
    pub files: usize,
    pub records: usize,
    pub names: usize,
    pub invalid_lines: usize,
}

/// Reads every hosts file in order and builds the record store.
///
/// Files are concatenated: entries for a name declared in several files
/// accumulate, and the first file to claim an address owns its reverse
/// entry. An unreadable file aborts the load.
pub async fn load_hosts_files(
    paths: &[String],
) -> Result<(RecordStore, HostsLoadSummary), DomainError> {
    let mut parsed = ParsedHosts::default();
    let mut invalid_lines = 0;

    for path in paths {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::HostsFile(format!("{}: {}", path, e)))?;

        let file = parse_hosts(&contents);
        for line in &file.invalid_lines {
            warn!(file = %path, line = *line, "Skipping hosts line with invalid address");
        }
        invalid_lines += file.invalid_lines.len();

        debug!(file = %path, records = file.records.len(), "Parsed hosts file");
        parsed.extend(file);
    }

    let store = RecordStore::from_records(parsed.records);
    let summary = HostsLoadSummary {
        files: paths.len(),
        records: store.record_count(),
        names: store.len(),
        invalid_lines,
    };

    if !paths.is_empty() {
        info!(
            "Loaded {} records from {} hosts files",
            summary.records, summary.files
        );
    }

    Ok((store, summary))
}
