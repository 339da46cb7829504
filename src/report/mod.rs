//! Report module for writing crawl results
//!
//! The sink is a CSV file named after the crawl's base domain. The two
//! record policies lay out different columns: the full report pairs every
//! URL with its status, the broken-only report is a single column of URLs
//! that answered with an error status.

mod csv;

pub use csv::{report_path, write_report, ReportError};

/// One visit outcome kept by the record policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    /// The requested canonical URL
    pub url: String,

    /// Final HTTP status after redirects, or 0 when no response arrived
    pub status: u16,
}
