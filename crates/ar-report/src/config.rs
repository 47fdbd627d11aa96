//! Report output configuration.

use crate::error::{ReportError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default report title.
pub const DEFAULT_TITLE: &str = "Arch Linux System Report";

/// Default file name prefix.
pub const DEFAULT_FILE_PREFIX: &str = "arch-report";

/// Timestamp layout embedded in report file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Where and how the report file is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Title of the document.
    pub title: String,
    /// File name prefix; the timestamp and `.md` are appended.
    pub file_prefix: String,
    /// Directory the report is written to.
    pub output_dir: PathBuf,
    /// Keep at most this many reports with the same prefix (None = keep all).
    pub keep_reports: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            output_dir: PathBuf::from("."),
            keep_reports: None,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<()> {
        if self.file_prefix.trim().is_empty() {
            return Err(ReportError::InvalidConfig(
                "file_prefix must not be empty".to_string(),
            ));
        }
        if self.file_prefix.contains(['/', '\\']) {
            return Err(ReportError::InvalidConfig(format!(
                "file_prefix must not contain path separators: {}",
                self.file_prefix
            )));
        }
        if self.keep_reports == Some(0) {
            return Err(ReportError::InvalidConfig(
                "keep_reports must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// File name for a report generated at `at`, e.g. `arch-report-20261019-123000.md`.
    pub fn file_name_for(&self, at: &DateTime<Local>) -> String {
        format!("{}-{}.md", self.file_prefix, at.format(FILE_TIMESTAMP_FORMAT))
    }
}
