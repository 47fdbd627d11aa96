//! Report generation: run the selected modules and stream their sections
//! into one Markdown file.

use crate::context::{CollectSettings, ReportContext};
use crate::modules::ModuleRegistry;
use crate::runner::{CommandRunner, CommandSpec};
use crate::selection::{ModuleSelection, SelectionError};
use ar_redact::RedactionFilter;
use ar_report::{
    prune_reports, ModuleOutcome, ModuleStatus, ReportConfig, ReportError, ReportHeader,
    ReportSummary, ReportWriter,
};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

pub type Result<T> = std::result::Result<T, GenerateError>;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub path: PathBuf,
    pub outcomes: Vec<ModuleOutcome>,
    /// Substitutions made by the redaction filter.
    pub redactions: usize,
    pub duration: Duration,
    /// Old reports removed by retention.
    pub pruned: Vec<PathBuf>,
}

impl GenerationSummary {
    pub fn written(&self) -> impl Iterator<Item = &ModuleOutcome> {
        self.outcomes.iter().filter(|o| o.is_written())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ModuleOutcome> {
        self.outcomes.iter().filter(|o| !o.is_written())
    }
}

/// Drives one report run.
pub struct ReportGenerator<'a> {
    registry: &'a ModuleRegistry,
    runner: &'a dyn CommandRunner,
    filter: &'a RedactionFilter,
    settings: &'a CollectSettings,
    report: &'a ReportConfig,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(
        registry: &'a ModuleRegistry,
        runner: &'a dyn CommandRunner,
        filter: &'a RedactionFilter,
        settings: &'a CollectSettings,
        report: &'a ReportConfig,
    ) -> Self {
        Self {
            registry,
            runner,
            filter,
            settings,
            report,
        }
    }

    pub fn generate(&self, selection: &ModuleSelection) -> Result<GenerationSummary> {
        self.generate_at(selection, Local::now())
    }

    /// Run with an explicit timestamp for the header and file name.
    ///
    /// Selection and output settings are checked before the file is created,
    /// so an invalid run leaves nothing behind.
    pub fn generate_at(
        &self,
        selection: &ModuleSelection,
        now: DateTime<Local>,
    ) -> Result<GenerationSummary> {
        let started = Instant::now();
        let modules = selection.resolve(self.registry)?;
        self.report.validate()?;

        let mut writer = ReportWriter::create(self.report, &now)?;
        let report_path = writer.path().to_path_buf();
        info!(
            path = %report_path.display(),
            modules = modules.len(),
            redaction = self.filter.is_enabled(),
            "generating report"
        );

        let mut ctx = ReportContext::new(&report_path, self.runner, self.filter, self.settings);
        writer.write_header(&ReportHeader {
            title: self.report.title.clone(),
            hostname: hostname(&ctx),
            generated_at: now,
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            modules: modules.iter().map(|m| m.id.to_string()).collect(),
            redaction_enabled: self.filter.is_enabled(),
        })?;

        let mut outcomes = Vec::with_capacity(modules.len());
        for module in modules {
            let missing = module.missing_commands(self.runner);
            if !missing.is_empty() {
                warn!(
                    module = module.id,
                    missing = %missing.join(", "),
                    "required commands not found; skipping module"
                );
                outcomes.push(ModuleOutcome {
                    id: module.id.to_string(),
                    title: module.title.to_string(),
                    status: ModuleStatus::Skipped { missing },
                });
                continue;
            }

            info!(module = module.id, "collecting");
            let section = module.collect(&mut ctx);
            writer.append_section(&section)?;
            outcomes.push(ModuleOutcome {
                id: module.id.to_string(),
                title: module.title.to_string(),
                status: ModuleStatus::Written {
                    failures: section.failure_count(),
                },
            });
        }

        let (facts, stats) = ctx.into_parts();
        let redactions = stats.total_hits();
        writer.write_summary(&ReportSummary {
            facts,
            outcomes: outcomes.clone(),
            redaction_enabled: self.filter.is_enabled(),
            redactions,
            duration_ms: started.elapsed().as_millis() as u64,
        })?;

        let pruned = match self.report.keep_reports {
            Some(keep) => prune_reports(
                &self.report.output_dir,
                &self.report.file_prefix,
                keep,
                Some(&report_path),
            )
            .unwrap_or_else(|e| {
                warn!(error = %e, "report retention failed");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let duration = started.elapsed();
        info!(
            path = %report_path.display(),
            bytes = writer.bytes_written(),
            sections = writer.sections_written(),
            redactions,
            duration_ms = duration.as_millis() as u64,
            "report complete"
        );

        Ok(GenerationSummary {
            path: report_path,
            outcomes,
            redactions,
            duration,
            pruned,
        })
    }
}

/// `/etc/hostname`, falling back to `uname -n`.
fn hostname(ctx: &ReportContext<'_>) -> Option<String> {
    ctx.read_system_file("/etc/hostname")
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .or_else(|| ctx.probe(&CommandSpec::new("uname", &["-n"])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_settings, ScriptedRunner};
    use ar_report::markdown::top_level_headings;
    use chrono::TimeZone;
    use filetime::{set_file_mtime, FileTime};
    use std::fs;
    use std::path::Path;

    fn report_in(dir: &Path) -> ReportConfig {
        ReportConfig {
            output_dir: dir.join("reports"),
            ..Default::default()
        }
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn hardware_runner() -> ScriptedRunner {
        ScriptedRunner::new()
            .respond("lscpu", "Model name: AMD Ryzen 7 5800X\n")
            .respond("uname -n", "archbox\n")
    }

    #[test]
    fn test_single_module_run() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = ModuleRegistry::builtin();
        let runner = hardware_runner();
        let filter = RedactionFilter::new();
        let settings = fixture_settings(tmp.path(), &[]);
        let report = report_in(tmp.path());
        let generator = ReportGenerator::new(&registry, &runner, &filter, &settings, &report);

        let summary = generator
            .generate_at(&ModuleSelection::from_list("hardware"), at())
            .unwrap();

        assert!(summary.path.ends_with("reports/arch-report-20261019-120000.md"));
        let content = fs::read_to_string(&summary.path).unwrap();
        assert!(content.starts_with("# Arch Linux System Report\n"));
        assert!(content.contains("- **Host:** archbox"));
        assert!(content.contains("- **Modules:** hardware"));
        assert_eq!(top_level_headings(&content), vec!["Hardware", "Summary"]);
        assert!(content.contains("| CPU | AMD Ryzen 7 5800X |"));
        assert_eq!(summary.written().count(), 1);
        assert_eq!(summary.skipped().count(), 0);
    }

    #[test]
    fn test_module_with_missing_requirement_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = ModuleRegistry::builtin();
        let runner = hardware_runner();
        let filter = RedactionFilter::new();
        let settings = fixture_settings(tmp.path(), &[]);
        let report = report_in(tmp.path());
        let generator = ReportGenerator::new(&registry, &runner, &filter, &settings, &report);

        let summary = generator
            .generate_at(&ModuleSelection::from_list("packages,hardware"), at())
            .unwrap();

        let content = fs::read_to_string(&summary.path).unwrap();
        assert_eq!(top_level_headings(&content), vec!["Hardware", "Summary"]);
        assert!(content.contains("- packages: skipped (missing: pacman)"));
        let skipped: Vec<&str> = summary.skipped().map(|o| o.id.as_str()).collect();
        assert_eq!(skipped, vec!["packages"]);
    }

    #[test]
    fn test_unknown_module_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = ModuleRegistry::builtin();
        let runner = ScriptedRunner::new();
        let filter = RedactionFilter::new();
        let settings = fixture_settings(tmp.path(), &[]);
        let report = report_in(tmp.path());
        let generator = ReportGenerator::new(&registry, &runner, &filter, &settings, &report);

        let err = generator
            .generate_at(&ModuleSelection::from_list("hardware,gpu"), at())
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Selection(SelectionError::UnknownModule { .. })
        ));
        assert!(!report.output_dir.exists());
    }

    #[test]
    fn test_redaction_count_in_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = ModuleRegistry::builtin();
        let runner = ScriptedRunner::new()
            .respond("ip -brief address", "wlan0 UP 192.168.1.20/24\n")
            .respond("ip route", "default via 192.168.1.1 dev wlan0\n");
        let filter = RedactionFilter::new();
        let settings = fixture_settings(tmp.path(), &[]);
        let report = report_in(tmp.path());
        let generator = ReportGenerator::new(&registry, &runner, &filter, &settings, &report);

        let summary = generator
            .generate_at(&ModuleSelection::from_list("network"), at())
            .unwrap();
        assert_eq!(summary.redactions, 2);

        let content = fs::read_to_string(&summary.path).unwrap();
        assert!(content.contains("Redactions applied: 2"));
        assert!(!content.contains("192.168.1."));
    }

    #[test]
    fn test_disabled_redaction_passes_output_through() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = ModuleRegistry::builtin();
        let runner = ScriptedRunner::new().respond("ip route", "default via 192.168.1.1 dev wlan0\n");
        let filter = RedactionFilter::disabled();
        let settings = fixture_settings(tmp.path(), &[]);
        let report = report_in(tmp.path());
        let generator = ReportGenerator::new(&registry, &runner, &filter, &settings, &report);

        let summary = generator
            .generate_at(&ModuleSelection::from_list("network"), at())
            .unwrap();
        let content = fs::read_to_string(&summary.path).unwrap();
        assert!(content.contains("default via 192.168.1.1 dev wlan0"));
        assert!(content.contains("- **Redaction:** disabled"));
        assert!(content.contains("Redaction disabled for this report."));
    }

    #[test]
    fn test_retention_after_run() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = ModuleRegistry::builtin();
        let runner = hardware_runner();
        let filter = RedactionFilter::new();
        let settings = fixture_settings(tmp.path(), &[]);
        let report = ReportConfig {
            keep_reports: Some(2),
            ..report_in(tmp.path())
        };
        fs::create_dir_all(&report.output_dir).unwrap();
        for day in ["01", "02", "03"] {
            fs::write(
                report.output_dir.join(format!("arch-report-202501{}-000000.md", day)),
                "# old\n",
            )
            .unwrap();
        }
        let generator = ReportGenerator::new(&registry, &runner, &filter, &settings, &report);

        let summary = generator
            .generate_at(&ModuleSelection::from_list("hardware"), at())
            .unwrap();

        assert_eq!(summary.pruned.len(), 2);
        assert!(summary.path.exists());
        let remaining = ar_report::list_reports(&report.output_dir, "arch-report").unwrap();
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_retention_keeps_fresh_report_despite_newer_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = ModuleRegistry::builtin();
        let runner = hardware_runner();
        let filter = RedactionFilter::new();
        let settings = fixture_settings(tmp.path(), &[]);
        let report = ReportConfig {
            keep_reports: Some(1),
            ..report_in(tmp.path())
        };
        fs::create_dir_all(&report.output_dir).unwrap();
        let old = report.output_dir.join("arch-report-20250101-000000.md");
        fs::write(&old, "# old\n").unwrap();
        let future = FileTime::from_unix_time(FileTime::now().unix_seconds() + 3600, 0);
        set_file_mtime(&old, future).unwrap();
        let generator = ReportGenerator::new(&registry, &runner, &filter, &settings, &report);

        let summary = generator
            .generate_at(&ModuleSelection::from_list("hardware"), at())
            .unwrap();

        assert!(summary.path.exists());
        assert_eq!(summary.pruned, vec![old.clone()]);
        assert!(!old.exists());
    }
}
