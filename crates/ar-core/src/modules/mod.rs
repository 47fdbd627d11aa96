//! Report modules and the registry that maps module names to handlers.
//!
//! A module is a named section of the report. Its handler runs commands and
//! reads files through the [`ReportContext`], appending blocks to the
//! section it is given. Modules whose required commands are missing are
//! skipped by the generator before the handler runs.

mod boot;
mod desktop;
mod development;
mod hardware;
mod network;
mod packages;
mod security;
mod services;
mod shell;
mod storage;
mod system;

use crate::context::ReportContext;
use crate::runner::{CommandRunner, CommandSpec};
use ar_report::Section;

/// Handler filling one module's section.
pub type ModuleHandler = fn(&mut ReportContext<'_>, &mut Section);

/// A report module.
#[derive(Debug, Clone, Copy)]
pub struct Module {
    /// Name used on the command line (`--modules=hardware`).
    pub id: &'static str,
    /// Section heading.
    pub title: &'static str,
    pub description: &'static str,
    /// Without all of these the module is skipped.
    pub required_commands: &'static [&'static str],
    /// Part of the `--basic` subset.
    pub basic: bool,
    pub handler: ModuleHandler,
}

impl Module {
    /// Required commands the runner cannot find.
    pub fn missing_commands(&self, runner: &dyn CommandRunner) -> Vec<String> {
        self.required_commands
            .iter()
            .filter(|cmd| !runner.exists(cmd))
            .map(|cmd| cmd.to_string())
            .collect()
    }

    /// Run the handler into a fresh section.
    pub fn collect(&self, ctx: &mut ReportContext<'_>) -> Section {
        let mut section = Section::new(self.id, self.title);
        (self.handler)(ctx, &mut section);
        section
    }
}

/// Modules in canonical report order.
#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
}

impl ModuleRegistry {
    /// Every module shipped with arch-report.
    pub fn builtin() -> Self {
        Self::from_modules(vec![
            system::MODULE,
            hardware::MODULE,
            packages::MODULE,
            services::MODULE,
            desktop::MODULE,
            network::MODULE,
            security::MODULE,
            shell::MODULE,
            development::MODULE,
            storage::MODULE,
            boot::MODULE,
        ])
    }

    pub fn from_modules(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Look a module up by id, ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&Module> {
        let name = name.trim();
        self.modules.iter().find(|m| m.id.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn basic(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter().filter(|m| m.basic)
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.id).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Non-empty lines in `text`.
fn count_lines(text: &str) -> usize {
    text.lines().filter(|l| !l.trim().is_empty()).count()
}

/// Value of a `Key: value` line, e.g. `Model name:` in `lscpu` output.
fn field_value(text: &str, key: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        (k.trim() == key)
            .then(|| v.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// `### title` and a table of tool versions; absent tools read "not installed".
///
/// Returns the labels of the tools found.
fn version_table(
    ctx: &mut ReportContext<'_>,
    section: &mut Section,
    title: &str,
    tools: &[(&str, CommandSpec)],
) -> Vec<String> {
    let mut rows = Vec::new();
    let mut found = Vec::new();
    for (label, spec) in tools {
        let value = if ctx.has_command(&spec.program) {
            found.push(label.to_string());
            ctx.probe_line(spec)
                .unwrap_or_else(|| "installed (version unavailable)".to_string())
        } else {
            "not installed".to_string()
        };
        rows.push((label.to_string(), value));
    }
    section.subheading(title);
    section.table(rows);
    found
}
