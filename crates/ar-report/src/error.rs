//! Error types for report writing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while writing or pruning reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The output directory could not be created or read.
    #[error("output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report file could not be opened or appended to.
    #[error("report file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An old report could not be removed.
    #[error("failed to remove old report {path}: {source}")]
    Prune {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
