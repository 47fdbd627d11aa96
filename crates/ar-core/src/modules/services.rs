//! systemd units, timers and recent journal errors.

use super::{count_lines, Module};
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "services",
    title: "Services",
    description: "running and failed systemd units, enabled unit files, timers, journal errors",
    required_commands: &["systemctl"],
    basic: true,
    handler: collect,
};

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    if let Some(running) = ctx.command(
        section,
        "Running Services",
        &list_units(&["--type=service", "--state=running"]),
        Sensitivity::Plain,
    ) {
        ctx.fact("Running services", count_lines(&running).to_string());
    }

    if let Some(failed) = ctx.command(
        section,
        "Failed Units",
        &list_units(&["--state=failed"]),
        Sensitivity::Plain,
    ) {
        ctx.fact("Failed units", count_lines(&failed).to_string());
    }

    ctx.command(
        section,
        "Enabled Unit Files",
        &CommandSpec::new(
            "systemctl",
            &["list-unit-files", "--state=enabled", "--no-pager", "--no-legend"],
        ),
        Sensitivity::Plain,
    );
    ctx.command(
        section,
        "Timers",
        &CommandSpec::new("systemctl", &["list-timers", "--all", "--no-pager"]),
        Sensitivity::Plain,
    );
    ctx.command(
        section,
        "User Services",
        &CommandSpec::new(
            "systemctl",
            &[
                "--user",
                "list-units",
                "--type=service",
                "--state=running",
                "--no-pager",
                "--no-legend",
                "--plain",
            ],
        ),
        Sensitivity::Plain,
    );
    ctx.command(
        section,
        "Journal Errors (current boot)",
        &CommandSpec::new("journalctl", &["-p", "err", "-b", "--no-pager", "-n", "30"]),
        Sensitivity::Sensitive,
    );
}

fn list_units(filters: &[&str]) -> CommandSpec {
    let mut args = vec!["list-units"];
    args.extend_from_slice(filters);
    args.extend_from_slice(&["--no-pager", "--no-legend", "--plain"]);
    CommandSpec::new("systemctl", &args)
}
