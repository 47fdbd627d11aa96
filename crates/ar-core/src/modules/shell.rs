//! Login shell, shell versions and shell startup files.

use super::{version_table, Module};
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "shell",
    title: "Shell",
    description: "login shell, installed shells and their startup files",
    required_commands: &[],
    basic: false,
    handler: collect,
};

/// Startup files shown, relative to `$HOME`.
const STARTUP_FILES: &[&str] = &[
    ".profile",
    ".bash_profile",
    ".bashrc",
    ".zprofile",
    ".zshrc",
    ".config/fish/config.fish",
];

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    if let Some(shell) = ctx.env_var("SHELL") {
        let name = shell.rsplit('/').next().unwrap_or(&shell).to_string();
        ctx.fact("Shell", name);
    }

    version_table(
        ctx,
        section,
        "Installed Shells",
        &[
            ("bash", CommandSpec::new("bash", &["--version"])),
            ("zsh", CommandSpec::new("zsh", &["--version"])),
            ("fish", CommandSpec::new("fish", &["--version"])),
        ],
    );

    for file in STARTUP_FILES {
        ctx.home_file(section, &format!("~/{}", file), file, Sensitivity::Sensitive);
    }
}
