//! Writes audit reports to disk as pretty-printed JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use time::Date;
use tracing::info;

use crate::domain::AuditReport;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// `audit-report-YYYY-MM-DD.json`
pub fn report_file_name(date: Date) -> String {
    format!(
        "audit-report-{:04}-{:02}-{:02}.json",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// The user's download folder, or the working directory when there is none.
pub fn export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Serialises `report` into `dir`, named after the report's own date.
pub fn write_report(report: &AuditReport, dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(report.timestamp.date()));
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)?;
    info!(
        path = %path.display(),
        completed = report.progress.completed,
        total = report.progress.total,
        "exported audit report"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use time::macros::{date, datetime};

    use super::*;
    use crate::domain::{AuditStatus, AuditTracker};

    #[test]
    fn file_name_is_zero_padded() {
        assert_eq!(report_file_name(date!(2025 - 01 - 07)), "audit-report-2025-01-07.json");
    }

    #[test]
    fn writes_report_named_by_date() {
        let dir = TempDir::new().unwrap();
        let mut tracker = AuditTracker::new();
        tracker
            .set_item_status("stakeholder-approval", AuditStatus::Passed)
            .unwrap();
        let report = tracker.export_report_at(datetime!(2024-11-30 23:59:59 UTC));

        let path = write_report(&report, dir.path()).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("audit-report-2024-11-30.json")
        );

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"timestamp\""));
        let parsed: AuditReport = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, report);
    }
}
