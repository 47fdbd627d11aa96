//! Per-run state threaded through every module handler.

use crate::config::AppConfig;
use crate::runner::{CommandRunner, CommandSpec};
use ar_redact::{RedactionFilter, RedactionStats};
use ar_report::{QuickFacts, Section};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Whether collected text passes through the redaction filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensitivity {
    Plain,
    Sensitive,
}

/// Where environment variables are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvSource {
    #[default]
    Process,
    Fixed(BTreeMap<String, String>),
}

/// Filesystem and environment view used by collectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectSettings {
    /// Lines of a configuration file copied into the report.
    pub max_file_lines: usize,
    /// Prefix for absolute system paths (`/` on a live system).
    pub root: PathBuf,
    /// The invoking user's home directory.
    pub home: Option<PathBuf>,
    pub env: EnvSource,
}

impl Default for CollectSettings {
    fn default() -> Self {
        Self {
            max_file_lines: crate::config::DEFAULT_MAX_FILE_LINES,
            root: PathBuf::from("/"),
            home: dirs::home_dir(),
            env: EnvSource::Process,
        }
    }
}

impl CollectSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_file_lines: config.max_file_lines,
            ..Default::default()
        }
    }

    /// Map an absolute system path like `/etc/os-release` under `root`.
    pub fn system_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// A path relative to the home directory.
    pub fn home_path(&self, relative: &str) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join(relative))
    }

    pub fn env_var(&self, name: &str) -> Option<String> {
        let value = match &self.env {
            EnvSource::Process => std::env::var(name).ok(),
            EnvSource::Fixed(vars) => vars.get(name).cloned(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// Shared state for one report run.
///
/// Handlers append blocks to their own [`Section`] and record quick facts
/// here; the generator owns the file.
pub struct ReportContext<'a> {
    report_path: &'a Path,
    runner: &'a dyn CommandRunner,
    filter: &'a RedactionFilter,
    settings: &'a CollectSettings,
    facts: QuickFacts,
    stats: RedactionStats,
}

impl<'a> ReportContext<'a> {
    pub fn new(
        report_path: &'a Path,
        runner: &'a dyn CommandRunner,
        filter: &'a RedactionFilter,
        settings: &'a CollectSettings,
    ) -> Self {
        Self {
            report_path,
            runner,
            filter,
            settings,
            facts: QuickFacts::new(),
            stats: RedactionStats::default(),
        }
    }

    /// Path of the report being written.
    pub fn report_path(&self) -> &Path {
        self.report_path
    }

    pub fn settings(&self) -> &CollectSettings {
        self.settings
    }

    pub fn facts(&self) -> &QuickFacts {
        &self.facts
    }

    pub fn redaction_stats(&self) -> &RedactionStats {
        &self.stats
    }

    pub fn into_parts(self) -> (QuickFacts, RedactionStats) {
        (self.facts, self.stats)
    }

    pub fn has_command(&self, program: &str) -> bool {
        self.runner.exists(program)
    }

    pub fn fact(&mut self, label: &str, value: impl Into<String>) {
        let value = value.into();
        let value = value.trim();
        if !value.is_empty() {
            self.facts.record(label, value);
        }
    }

    pub fn env_var(&self, name: &str) -> Option<String> {
        self.settings.env_var(name)
    }

    /// Apply the filter to `text` when it is sensitive, counting substitutions.
    pub fn redact(&mut self, text: &str, sensitivity: Sensitivity) -> String {
        match sensitivity {
            Sensitivity::Plain => text.to_string(),
            Sensitivity::Sensitive => {
                let (out, stats) = self.filter.redact_text(text);
                self.stats.merge(&stats);
                out
            }
        }
    }

    /// `### title` followed by the output of `spec`.
    ///
    /// Returns the text as written to the report.
    pub fn command(
        &mut self,
        section: &mut Section,
        title: &str,
        spec: &CommandSpec,
        sensitivity: Sensitivity,
    ) -> Option<String> {
        section.subheading(title);
        self.command_output(section, spec, sensitivity)
    }

    /// Output of `spec` without a subheading.
    ///
    /// Absent programs get a "not installed" marker and failures an
    /// "error executing" marker; neither aborts the module.
    pub fn command_output(
        &mut self,
        section: &mut Section,
        spec: &CommandSpec,
        sensitivity: Sensitivity,
    ) -> Option<String> {
        if !self.runner.exists(&spec.program) {
            debug!(command = %spec.program, "not installed");
            section.not_installed(spec.program.clone());
            return None;
        }

        match self.runner.run(spec) {
            Ok(output) => {
                let text = output.text(spec.merge_stderr);
                if text.trim().is_empty() {
                    section.text("_No output._");
                    return Some(String::new());
                }
                let shown = self.redact(&text, sensitivity);
                section.code(shown.clone(), output.truncated);
                Some(shown)
            }
            Err(e) => {
                warn!(command = %spec, error = %e, "command failed");
                section.failed(spec.display(), e.to_string());
                None
            }
        }
    }

    /// Run `spec` quietly for a fact; nothing is written to the report.
    pub fn probe(&self, spec: &CommandSpec) -> Option<String> {
        if !self.runner.exists(&spec.program) {
            return None;
        }
        match self.runner.run(spec) {
            Ok(output) => {
                let text = output.text(spec.merge_stderr);
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Err(e) => {
                debug!(command = %spec, error = %e, "probe failed");
                None
            }
        }
    }

    /// First line of `spec`'s output, for version tables.
    pub fn probe_line(&self, spec: &CommandSpec) -> Option<String> {
        self.probe(spec)
            .and_then(|text| text.lines().next().map(|l| l.trim().to_string()))
    }

    /// Raw content of a system file, for parsing facts.
    pub fn read_system_file(&self, path: &str) -> Option<String> {
        read_lossy(&self.settings.system_path(path))
    }

    /// `### title` followed by the capped content of a system file.
    pub fn system_file(
        &mut self,
        section: &mut Section,
        title: &str,
        path: &str,
        sensitivity: Sensitivity,
    ) -> bool {
        let full = self.settings.system_path(path);
        self.file(section, title, &full, sensitivity)
    }

    /// `### title` followed by the capped content of a file under `$HOME`.
    pub fn home_file(
        &mut self,
        section: &mut Section,
        title: &str,
        relative: &str,
        sensitivity: Sensitivity,
    ) -> bool {
        match self.settings.home_path(relative) {
            Some(path) => self.file(section, title, &path, sensitivity),
            None => false,
        }
    }

    /// Absent or unreadable files are omitted entirely. Returns whether
    /// anything was written.
    pub fn file(
        &mut self,
        section: &mut Section,
        title: &str,
        path: &Path,
        sensitivity: Sensitivity,
    ) -> bool {
        let Some(content) = read_lossy(path) else {
            return false;
        };
        let (capped, truncated) = cap_lines(&content, self.settings.max_file_lines);

        section.subheading(title);
        if capped.trim().is_empty() {
            section.text("_Empty file._");
            return true;
        }
        let shown = self.redact(&capped, sensitivity);
        section.code(shown, truncated);
        true
    }
}

fn read_lossy(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "file not readable; omitted");
            None
        }
    }
}

/// Keep the first `max` lines. Returns whether anything was cut.
pub fn cap_lines(content: &str, max: usize) -> (String, bool) {
    let mut lines = content.split_inclusive('\n');
    let kept: String = lines.by_ref().take(max).collect();
    let truncated = lines.next().is_some();
    (kept, truncated)
}
