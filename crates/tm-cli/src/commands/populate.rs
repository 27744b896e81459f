//! The `tm populate` command: bulk import from a snapshot file.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tm_db::{Ledger, Snapshot};

use crate::cli::SnapshotFormat;

/// Imports accounts and time entries from a JSON or YAML snapshot.
///
/// Duplicate accounts and entries naming unknown accounts are skipped
/// with a warning rather than aborting the import.
pub fn run(ledger: &mut Ledger, file: &Path, format: SnapshotFormat) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let snapshot = parse_snapshot(&raw, format)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let now = Utc::now().timestamp();
    let stats = ledger.import_snapshot(&snapshot, now)?;

    println!(
        "Imported {} account(s) and {} timer(s) ({} account(s), {} timer(s) skipped)",
        stats.accounts_added, stats.timers_added, stats.accounts_skipped, stats.timers_skipped
    );
    Ok(())
}

fn parse_snapshot(raw: &str, format: SnapshotFormat) -> Result<Snapshot> {
    let snapshot = match format {
        SnapshotFormat::Json => serde_json::from_str(raw)?,
        SnapshotFormat::Yaml => serde_yaml::from_str(raw)?,
    };
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_snapshot() {
        let raw = r#"{
            "accounts": [{"account_name": "Work"}],
            "times": [
                {"account_name": "Work", "memo": "emails", "timedelta": 3600, "datetime": 1000}
            ]
        }"#;
        let snapshot = parse_snapshot(raw, SnapshotFormat::Json).unwrap();
        assert_eq!(snapshot.accounts.len(), 1);
        assert_eq!(snapshot.times.len(), 1);
        assert_eq!(snapshot.times[0].timedelta, 3600);
    }

    #[test]
    fn test_parse_yaml_snapshot() {
        let raw = "
accounts:
  - account_name: Work
times:
  - account_name: Work
    memo: emails
    timedelta: 3600
    datetime: 1000
  - account_name: Play
";
        let snapshot = parse_snapshot(raw, SnapshotFormat::Yaml).unwrap();
        assert_eq!(snapshot.accounts.len(), 1);
        assert_eq!(snapshot.times.len(), 2);
        // Omitted fields take their defaults.
        assert_eq!(snapshot.times[1].timedelta, 0);
        assert_eq!(snapshot.times[1].datetime, None);
        assert_eq!(snapshot.times[1].memo, "");
    }

    #[test]
    fn test_sections_are_optional() {
        let snapshot = parse_snapshot("{}", SnapshotFormat::Json).unwrap();
        assert!(snapshot.accounts.is_empty());
        assert!(snapshot.times.is_empty());
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(parse_snapshot("{", SnapshotFormat::Json).is_err());
        assert!(parse_snapshot("accounts: {not: a list}", SnapshotFormat::Yaml).is_err());
    }
}
