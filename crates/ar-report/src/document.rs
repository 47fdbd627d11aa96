//! Report document model.
//!
//! Handlers fill [`Section`]s with [`Block`]s; nothing here touches the file
//! system. Rendering lives in [`crate::markdown`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One unit of section content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// `### title`
    Subheading { title: String },
    /// Fenced command output or file content.
    Code {
        text: String,
        /// Set when the content was cut at a line or byte cap.
        truncated: bool,
    },
    /// Two-column label/value table.
    Table { rows: Vec<(String, String)> },
    /// Free paragraph.
    Text { text: String },
    /// A command this subsection needs is not installed.
    NotInstalled { command: String },
    /// A command ran but failed.
    Failed { command: String, reason: String },
}

/// A top-level report section produced by one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Module id (`hardware`, `packages`, ...).
    pub id: String,
    /// Heading text.
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn subheading(&mut self, title: impl Into<String>) {
        self.push(Block::Subheading {
            title: title.into(),
        });
    }

    pub fn code(&mut self, text: impl Into<String>, truncated: bool) {
        self.push(Block::Code {
            text: text.into(),
            truncated,
        });
    }

    pub fn table<L, V>(&mut self, rows: impl IntoIterator<Item = (L, V)>)
    where
        L: Into<String>,
        V: Into<String>,
    {
        let rows: Vec<(String, String)> = rows
            .into_iter()
            .map(|(label, value)| (label.into(), value.into()))
            .collect();
        if !rows.is_empty() {
            self.push(Block::Table { rows });
        }
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.push(Block::Text { text: text.into() });
    }

    pub fn not_installed(&mut self, command: impl Into<String>) {
        self.push(Block::NotInstalled {
            command: command.into(),
        });
    }

    pub fn failed(&mut self, command: impl Into<String>, reason: impl Into<String>) {
        self.push(Block::Failed {
            command: command.into(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of inline "error executing" markers.
    pub fn failure_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Failed { .. }))
            .count()
    }
}

/// Metadata written at the top of every report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportHeader {
    pub title: String,
    pub hostname: Option<String>,
    pub generated_at: DateTime<Local>,
    pub generator_version: String,
    /// Module ids selected for this run, in run order.
    pub modules: Vec<String>,
    pub redaction_enabled: bool,
}

/// Ordered label/value pairs collected while modules run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickFacts {
    facts: Vec<(String, String)>,
}

impl QuickFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fact. A label recorded twice keeps its first position and the latest value.
    pub fn record(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.facts.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.facts.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facts.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// What happened to one selected module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Section written; `failures` counts inline error markers.
    Written { failures: usize },
    /// Required commands missing; no section written.
    Skipped { missing: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOutcome {
    pub id: String,
    pub title: String,
    pub status: ModuleStatus,
}

impl ModuleOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self.status, ModuleStatus::Written { .. })
    }
}

/// Data for the closing summary section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub facts: QuickFacts,
    pub outcomes: Vec<ModuleOutcome>,
    pub redaction_enabled: bool,
    /// Substitutions made by the redaction filter across the whole report.
    pub redactions: usize,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_builders() {
        let mut section = Section::new("hardware", "Hardware");
        assert!(section.is_empty());
        section.subheading("CPU");
        section.code("Architecture: x86_64", false);
        section.not_installed("lspci");
        section.failed("sensors", "exit status 1");
        assert_eq!(section.blocks.len(), 4);
        assert_eq!(section.failure_count(), 1);
    }

    #[test]
    fn test_empty_table_is_dropped() {
        let mut section = Section::new("system", "System");
        section.table(Vec::<(String, String)>::new());
        assert!(section.is_empty());
        section.table([("Kernel", "6.9.7-arch1-1")]);
        assert_eq!(section.blocks.len(), 1);
    }

    #[test]
    fn test_quick_facts_keep_first_position() {
        let mut facts = QuickFacts::new();
        facts.record("Kernel", "6.1");
        facts.record("Packages", "900");
        facts.record("Kernel", "6.9");
        let collected: Vec<_> = facts.iter().collect();
        assert_eq!(collected, vec![("Kernel", "6.9"), ("Packages", "900")]);
        assert_eq!(facts.get("Packages"), Some("900"));
        assert_eq!(facts.get("Missing"), None);
    }
}
