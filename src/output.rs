//! Output formatting and persistence for analysis results.
//!
//! Supports logging readable tables, JSON serialization, and CSV export.

use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{FrequencyEntry, GroupAverage};
use crate::cleaner::CleaningReport;
use crate::record::Record;

/// Logs a sorted frequency table, one `value : percentage` line per entry.
pub fn print_frequencies(entries: &[FrequencyEntry]) {
    for entry in entries {
        info!("{} : {:.2}", entry.value, entry.percentage);
    }
}

/// Logs grouped averages, one `group : mean` line per group.
pub fn print_averages(groups: &[GroupAverage]) {
    for group in groups {
        info!(count = group.count, "{} : {:.2}", group.group, group.mean);
    }
}

/// Logs a cleaning report using Rust's debug pretty-print format.
pub fn print_pretty(report: &CleaningReport) {
    debug!("{:#?}", report);
}

/// Serializes any report to pretty-printed JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes serializable rows to a new CSV file, replacing any existing one.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a header and raw records to a new CSV file.
pub fn write_records(path: &Path, header: &Record, records: &[Record]) -> Result<()> {
    debug!(path = %path.display(), rows = records.len(), "Writing records");

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    writer.write_record(header.fields())?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Platform;
    use std::fs;

    fn report() -> CleaningReport {
        CleaningReport {
            platform: Platform::GooglePlay,
            rows_in: 10,
            corrupt_dropped: 1,
            duplicates_dropped: 2,
            non_english_dropped: 1,
            paid_dropped: 1,
            rows_out: 5,
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&report());
    }

    #[test]
    fn test_to_json_uses_snake_case_platform() {
        let json = to_json(&report()).unwrap();
        assert!(json.contains("\"platform\": \"google_play\""));
        assert!(json.contains("\"rows_out\": 5"));
    }

    #[test]
    fn test_write_rows_frequencies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genres.csv");

        let entries = vec![
            FrequencyEntry {
                value: "Games".to_string(),
                percentage: 58.0,
            },
            FrequencyEntry {
                value: "Entertainment".to_string(),
                percentage: 42.0,
            },
        ];
        write_rows(&path, &entries).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["value,percentage", "Games,58.0", "Entertainment,42.0"]);
    }

    #[test]
    fn test_write_rows_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("averages.csv");

        let groups = vec![GroupAverage {
            group: "GAME".to_string(),
            count: 2,
            mean: 500250.0,
            stddev: 499750.0,
        }];
        write_rows(&path, &groups).unwrap();
        write_rows(&path, &groups).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_write_records_round_trips_quoted_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.csv");

        let header: Record = ["App", "Installs"].into_iter().collect();
        let rows: Vec<Record> = vec![["Maps, Offline", "1,000+"].into_iter().collect()];
        write_records(&path, &header, &rows).unwrap();

        let dataset = crate::loader::load_dataset(&path).unwrap();
        assert_eq!(dataset.header, header);
        assert_eq!(dataset.rows, rows);
    }
}
