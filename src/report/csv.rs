use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::RecordPolicy;
use crate::report::VisitRecord;

/// Errors raised by the CSV sink
///
/// These never abort a crawl; the caller logs them and moves on.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Full report row: every visited URL with its final status
#[derive(Debug, Serialize)]
struct FullRow<'a> {
    enlace: &'a str,
    codigo_estado: u16,
}

/// Broken-only report row
#[derive(Debug, Serialize)]
struct BrokenRow<'a> {
    enlace_roto: &'a str,
}

/// Builds the report path: `<base_domain>.csv` inside the output directory
///
/// file:// crawls have no host, so their report is named `local.csv`.
pub fn report_path(output_dir: &Path, base_domain: &str) -> PathBuf {
    let stem = if base_domain.is_empty() {
        "local"
    } else {
        base_domain
    };
    output_dir.join(format!("{}.csv", stem))
}

/// Writes the records as UTF-8 CSV, header row first
///
/// The header comes from the row struct's field names on the first
/// serialize call: `enlace,codigo_estado` for the full report,
/// `enlace_roto` for the broken-only report. Records arrive already
/// filtered by the policy; here the policy only selects the column layout.
pub fn write_report(
    records: &[VisitRecord],
    policy: RecordPolicy,
    path: &Path,
) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;

    match policy {
        RecordPolicy::All => {
            for record in records {
                writer.serialize(FullRow {
                    enlace: &record.url,
                    codigo_estado: record.status,
                })?;
            }
        }
        RecordPolicy::BrokenOnly => {
            for record in records {
                writer.serialize(BrokenRow {
                    enlace_roto: &record.url,
                })?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<VisitRecord> {
        vec![
            VisitRecord {
                url: "https://example.com".to_string(),
                status: 200,
            },
            VisitRecord {
                url: "https://example.com/missing".to_string(),
                status: 404,
            },
            VisitRecord {
                url: "https://example.com/dead".to_string(),
                status: 0,
            },
        ]
    }

    #[test]
    fn test_full_report_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = report_path(dir.path(), "example.com");
        write_report(&sample_records(), RecordPolicy::All, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("enlace,codigo_estado"));
        assert_eq!(lines.next(), Some("https://example.com,200"));
        assert_eq!(lines.next(), Some("https://example.com/missing,404"));
        assert_eq!(lines.next(), Some("https://example.com/dead,0"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_broken_only_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = report_path(dir.path(), "example.com");
        let records = vec![VisitRecord {
            url: "https://example.com/missing".to_string(),
            status: 404,
        }];
        write_report(&records, RecordPolicy::BrokenOnly, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("enlace_roto"));
        assert_eq!(lines.next(), Some("https://example.com/missing"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_urls_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = report_path(dir.path(), "example.com");
        let records = vec![VisitRecord {
            url: "https://example.com/a,b".to_string(),
            status: 200,
        }];
        write_report(&records, RecordPolicy::All, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"https://example.com/a,b\",200"));
    }

    #[test]
    fn test_report_path_uses_base_domain() {
        let path = report_path(Path::new("/tmp/reports"), "example.com");
        assert_eq!(path, PathBuf::from("/tmp/reports/example.com.csv"));
    }

    #[test]
    fn test_report_path_keeps_port() {
        let path = report_path(Path::new("."), "127.0.0.1:8080");
        assert_eq!(path, PathBuf::from("./127.0.0.1:8080.csv"));
    }

    #[test]
    fn test_report_path_local_fallback() {
        let path = report_path(Path::new("."), "");
        assert_eq!(path, PathBuf::from("./local.csv"));
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("report.csv");
        let result = write_report(&sample_records(), RecordPolicy::All, &path);
        assert!(result.is_err());
    }
}
