//! Report rotation: keep the newest N reports in the output directory.
//!
//! Only files named like reports this tool writes
//! (`<prefix>-YYYYMMDD-HHMMSS[-N].md`) are ever considered. Every removal
//! is logged.

use crate::error::{ReportError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// A report file found in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Whether `file_name` is a report written with `prefix`.
pub fn is_report_file(file_name: &str, prefix: &str) -> bool {
    let Some(rest) = file_name
        .strip_prefix(prefix)
        .and_then(|r| r.strip_prefix('-'))
        .and_then(|r| r.strip_suffix(".md"))
    else {
        return false;
    };

    let mut parts = rest.split('-');
    let date_ok = parts
        .next()
        .is_some_and(|d| d.len() == 8 && d.bytes().all(|b| b.is_ascii_digit()));
    let time_ok = parts
        .next()
        .is_some_and(|t| t.len() == 6 && t.bytes().all(|b| b.is_ascii_digit()));
    let suffix_ok = match parts.next() {
        None => true,
        Some(n) => !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()),
    };
    date_ok && time_ok && suffix_ok && parts.next().is_none()
}

/// Reports with `prefix` in `dir`, newest first.
pub fn list_reports(dir: &Path, prefix: &str) -> Result<Vec<ReportFile>> {
    let entries = fs::read_dir(dir).map_err(|source| ReportError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut reports = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !is_report_file(name, prefix) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        reports.push(ReportFile {
            path: entry.path(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    reports.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.path.cmp(&a.path)));
    Ok(reports)
}

/// Delete all but the `keep` newest reports. Returns the removed paths.
///
/// `current` is never removed and counts as one of the kept reports, whatever
/// the mtimes of the other files say.
pub fn prune_reports(
    dir: &Path,
    prefix: &str,
    keep: usize,
    current: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let mut reports = list_reports(dir, prefix)?;
    debug!(found = reports.len(), keep, "checking report retention");

    let mut keep = keep;
    if let Some(current) = current {
        let before = reports.len();
        reports.retain(|r| !same_file(&r.path, current));
        if reports.len() < before {
            keep = keep.saturating_sub(1);
        }
    }

    let mut removed = Vec::new();
    for report in reports.into_iter().skip(keep) {
        fs::remove_file(&report.path).map_err(|source| ReportError::Prune {
            path: report.path.clone(),
            source,
        })?;
        info!(path = %report.path.display(), "removed old report");
        removed.push(report.path);
    }
    Ok(removed)
}

fn same_file(a: &Path, b: &Path) -> bool {
    a == b || (a.file_name() == b.file_name() && fs::canonicalize(a).ok() == fs::canonicalize(b).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_report_file() {
        assert!(is_report_file("arch-report-20261019-120000.md", "arch-report"));
        assert!(is_report_file("arch-report-20261019-120000-3.md", "arch-report"));
        assert!(!is_report_file("arch-report-20261019-120000.txt", "arch-report"));
        assert!(!is_report_file("arch-report-2026101-120000.md", "arch-report"));
        assert!(!is_report_file("arch-report-20261019-120000-.md", "arch-report"));
        assert!(!is_report_file("arch-report-20261019-120000-1-2.md", "arch-report"));
        assert!(!is_report_file("notes.md", "arch-report"));
        assert!(!is_report_file("other-20261019-120000.md", "arch-report"));
    }
}
