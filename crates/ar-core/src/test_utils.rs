//! Scripted command runner for tests.
//!
//! # Example
//!
//! ```ignore
//! use ar_core::test_utils::ScriptedRunner;
//!
//! let runner = ScriptedRunner::new()
//!     .respond("lscpu", "Model name: Ryzen 7 5800X\n")
//!     .fail("ufw status", 1, "ERROR: You need to be root")
//!     .install("pacman");
//! ```

use crate::context::{CollectSettings, EnvSource, ReportContext};
use crate::modules::ModuleRegistry;
use crate::runner::{CommandOutput, CommandRunner, CommandSpec, RunError};
use ar_redact::{RedactionFilter, RedactionStats};
use ar_report::{QuickFacts, Section};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A [`CommandRunner`] answering from a script.
///
/// Programs are "installed" when named by [`install`](Self::install) or by
/// any scripted command line. Installed programs without a scripted
/// response succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    installed: BTreeSet<String>,
    responses: BTreeMap<String, CommandOutput>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(mut self, program: &str) -> Self {
        self.installed.insert(program.to_string());
        self
    }

    pub fn install_all(mut self, programs: &[&str]) -> Self {
        self.installed
            .extend(programs.iter().map(|p| p.to_string()));
        self
    }

    /// `command_line` (as printed by [`CommandSpec::display`]) prints `stdout` and exits 0.
    pub fn respond(self, command_line: &str, stdout: &str) -> Self {
        self.respond_with_exit(command_line, stdout, 0)
    }

    pub fn respond_with_exit(mut self, command_line: &str, stdout: &str, code: i32) -> Self {
        self.register(
            command_line,
            CommandOutput {
                stdout: stdout.to_string(),
                exit_code: Some(code),
                ..Default::default()
            },
        );
        self
    }

    /// `command_line` prints `stderr` and exits with `code`.
    pub fn fail(mut self, command_line: &str, code: i32, stderr: &str) -> Self {
        self.register(
            command_line,
            CommandOutput {
                stderr: stderr.to_string(),
                exit_code: Some(code),
                ..Default::default()
            },
        );
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn register(&mut self, command_line: &str, output: CommandOutput) {
        if let Some(program) = command_line.split_whitespace().next() {
            self.installed.insert(program.to_string());
        }
        self.responses.insert(command_line.to_string(), output);
    }
}

impl CommandRunner for ScriptedRunner {
    fn exists(&self, program: &str) -> bool {
        self.installed.contains(program)
    }

    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, RunError> {
        let line = spec.display();
        self.calls.borrow_mut().push(line.clone());

        if !self.exists(&spec.program) {
            return Err(RunError::NotFound(spec.program.clone()));
        }
        let output = self
            .responses
            .get(&line)
            .cloned()
            .unwrap_or_else(|| CommandOutput::success(""));
        spec.check_exit(output)
    }
}

/// Settings rooted at a fixture directory, with `$HOME` at `root/home/alice`
/// and only the given environment variables set.
pub fn fixture_settings(root: &Path, env: &[(&str, &str)]) -> CollectSettings {
    CollectSettings {
        max_file_lines: 50,
        root: root.to_path_buf(),
        home: Some(root.join("home/alice")),
        env: EnvSource::Fixed(
            env.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
    }
}

/// Run one built-in module's handler with the default redaction filter.
///
/// Panics on an unknown module id.
pub fn collect_module(
    id: &str,
    runner: &dyn CommandRunner,
    settings: &CollectSettings,
) -> (Section, QuickFacts, RedactionStats) {
    let registry = ModuleRegistry::builtin();
    let module = registry
        .get(id)
        .unwrap_or_else(|| panic!("unknown module {}", id));
    let filter = RedactionFilter::new();
    let report_path = settings.root.join("report.md");
    let mut ctx = ReportContext::new(&report_path, runner, &filter, settings);
    let section = module.collect(&mut ctx);
    let (facts, stats) = ctx.into_parts();
    (section, facts, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_runner() {
        let runner = ScriptedRunner::new()
            .respond("uname -r", "6.9.1-arch1-1\n")
            .respond_with_exit("pacman -Qdtq", "", 1)
            .install("lscpu");

        assert!(runner.exists("uname"));
        assert!(runner.exists("pacman"));
        assert!(runner.exists("lscpu"));
        assert!(!runner.exists("yay"));

        let out = runner.run(&CommandSpec::new("uname", &["-r"])).unwrap();
        assert_eq!(out.stdout, "6.9.1-arch1-1\n");

        assert!(runner.run(&CommandSpec::new("pacman", &["-Qdtq"])).is_err());
        assert!(runner
            .run(&CommandSpec::new("pacman", &["-Qdtq"]).accept_exit(1))
            .is_ok());

        assert_eq!(runner.run(&CommandSpec::new("lscpu", &[])).unwrap().stdout, "");
        assert!(matches!(
            runner.run(&CommandSpec::new("yay", &["--version"])),
            Err(RunError::NotFound(_))
        ));
        assert_eq!(runner.calls().len(), 5);
    }
}
