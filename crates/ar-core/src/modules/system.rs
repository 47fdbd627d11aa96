//! Operating system, kernel, host and locale.

use super::Module;
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "system",
    title: "System",
    description: "OS release, kernel, host identity, uptime, time and locale settings",
    required_commands: &[],
    basic: true,
    handler: collect,
};

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    if let Some(release) = ctx.read_system_file("/etc/os-release") {
        if let Some(name) = os_release_value(&release, "PRETTY_NAME") {
            ctx.fact("OS", name);
        }
    }
    ctx.system_file(section, "OS Release", "/etc/os-release", Sensitivity::Plain);

    ctx.command(
        section,
        "Kernel",
        &CommandSpec::new("uname", &["-a"]),
        Sensitivity::Plain,
    );
    if let Some(release) = ctx.probe(&CommandSpec::new("uname", &["-r"])) {
        ctx.fact("Kernel", release);
    }

    ctx.command(
        section,
        "Host",
        &CommandSpec::new("hostnamectl", &[]),
        Sensitivity::Sensitive,
    );

    if let Some(uptime) = ctx.command(
        section,
        "Uptime",
        &CommandSpec::new("uptime", &["-p"]),
        Sensitivity::Plain,
    ) {
        let uptime = uptime.trim();
        ctx.fact("Uptime", uptime.strip_prefix("up ").unwrap_or(uptime));
    }

    ctx.command(
        section,
        "Time and Date",
        &CommandSpec::new("timedatectl", &[]),
        Sensitivity::Plain,
    );
    ctx.command(
        section,
        "Locale",
        &CommandSpec::new("localectl", &["status"]),
        Sensitivity::Plain,
    );
}

/// Value of `key` in an os-release file, quotes removed.
fn os_release_value(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (k, v) = line.trim().split_once('=')?;
        if k != key {
            return None;
        }
        let v = v.trim().trim_matches('"').trim_matches('\'');
        (!v.is_empty()).then(|| v.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{collect_module, fixture_settings, ScriptedRunner};
    use ar_report::Block;
    use std::fs;

    #[test]
    fn test_os_release_value() {
        let content = "NAME=\"Arch Linux\"\nPRETTY_NAME=\"Arch Linux\"\nID=arch\nBUILD_ID=rolling\n";
        assert_eq!(
            os_release_value(content, "PRETTY_NAME").as_deref(),
            Some("Arch Linux")
        );
        assert_eq!(os_release_value(content, "ID").as_deref(), Some("arch"));
        assert_eq!(os_release_value(content, "VERSION_ID"), None);
    }

    #[test]
    fn test_system_section_and_facts() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("etc")).unwrap();
        fs::write(
            tmp.path().join("etc/os-release"),
            "NAME=\"Arch Linux\"\nPRETTY_NAME=\"Arch Linux\"\nID=arch\n",
        )
        .unwrap();
        let settings = fixture_settings(tmp.path(), &[]);
        let runner = ScriptedRunner::new()
            .respond("uname -a", "Linux archbox 6.9.1-arch1-1 #1 SMP x86_64 GNU/Linux\n")
            .respond("uname -r", "6.9.1-arch1-1\n")
            .respond("uptime -p", "up 3 hours, 12 minutes\n")
            .respond(
                "hostnamectl",
                " Static hostname: archbox\n   Operating System: Arch Linux\n",
            );

        let (section, facts, _) = collect_module("system", &runner, &settings);

        assert_eq!(section.title, "System");
        assert_eq!(facts.get("OS"), Some("Arch Linux"));
        assert_eq!(facts.get("Kernel"), Some("6.9.1-arch1-1"));
        assert_eq!(facts.get("Uptime"), Some("3 hours, 12 minutes"));

        // timedatectl and localectl are not installed in this script
        let missing: Vec<&str> = section
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::NotInstalled { command } => Some(command.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(missing, vec!["timedatectl", "localectl"]);
    }
}
