//! Append-only report writer.
//!
//! The report file is opened in append mode once and every chunk (header,
//! each module section, summary) is flushed as soon as it is rendered, so an
//! interrupted run still leaves the sections collected so far on disk.

use crate::config::ReportConfig;
use crate::document::{ReportHeader, ReportSummary, Section};
use crate::error::{ReportError, Result};
use crate::markdown;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Upper bound on `-N` suffixes tried when a report with the same timestamp exists.
const MAX_NAME_COLLISIONS: u32 = 100;

/// Single writer for one report file.
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
    file: File,
    bytes_written: u64,
    sections_written: usize,
}

impl ReportWriter {
    /// Create the output directory if needed and open a fresh report file.
    ///
    /// A second run within the same second gets a `-1`, `-2`, ... suffix
    /// rather than appending to the earlier report.
    pub fn create(config: &ReportConfig, at: &DateTime<Local>) -> Result<Self> {
        std::fs::create_dir_all(&config.output_dir).map_err(|source| ReportError::OutputDir {
            path: config.output_dir.clone(),
            source,
        })?;

        let base = config.file_name_for(at);
        let stem = base.trim_end_matches(".md");
        for attempt in 0..=MAX_NAME_COLLISIONS {
            let path = if attempt == 0 {
                config.output_dir.join(&base)
            } else {
                config.output_dir.join(format!("{}-{}.md", stem, attempt))
            };
            // create_new fails if another run claimed the name first
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    debug!(path = %path.display(), "report file created");
                    return Ok(Self::from_file(path, file));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(ReportError::Write { path, source }),
            }
        }

        Err(ReportError::Write {
            path: config.output_dir.join(base),
            source: std::io::Error::new(
                ErrorKind::AlreadyExists,
                "too many reports with the same timestamp",
            ),
        })
    }

    /// Open `path` for appending, creating it if missing.
    pub fn open(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ReportError::Write {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "report file opened");
        Ok(Self::from_file(path, file))
    }

    fn from_file(path: PathBuf, file: File) -> Self {
        Self {
            path,
            file,
            bytes_written: 0,
            sections_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn sections_written(&self) -> usize {
        self.sections_written
    }

    pub fn write_header(&mut self, header: &ReportHeader) -> Result<()> {
        self.append(&markdown::render_header(header))
    }

    pub fn append_section(&mut self, section: &Section) -> Result<()> {
        self.append(&markdown::render_section(section))?;
        self.sections_written += 1;
        trace!(section = %section.id, "section appended");
        Ok(())
    }

    pub fn write_summary(&mut self, summary: &ReportSummary) -> Result<()> {
        self.append(&markdown::render_summary(summary))
    }

    fn append(&mut self, chunk: &str) -> Result<()> {
        self.file
            .write_all(chunk.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|source| ReportError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }
}
