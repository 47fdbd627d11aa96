//! Markdown report model and writer for arch-report.
//!
//! This crate owns everything about the report document itself:
//! - the section/block model that module handlers fill in
//! - Markdown rendering of header, sections and summary
//! - the append-only file writer
//! - rotation of old reports

pub mod config;
pub mod document;
pub mod error;
pub mod markdown;
pub mod retention;
pub mod writer;

pub use config::ReportConfig;
pub use document::{
    Block, ModuleOutcome, ModuleStatus, QuickFacts, ReportHeader, ReportSummary, Section,
};
pub use error::{ReportError, Result};
pub use retention::{list_reports, prune_reports, ReportFile};
pub use writer::ReportWriter;
