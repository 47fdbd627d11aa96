//! Boot loader, kernel command line, initramfs and boot timing.

use super::Module;
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "boot",
    title: "Boot",
    description: "boot timing, boot loader status and configuration, kernel command line, mkinitcpio",
    required_commands: &[],
    basic: false,
    handler: collect,
};

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    if let Some(timing) = ctx.command(
        section,
        "Boot Time",
        &CommandSpec::new("systemd-analyze", &[]),
        Sensitivity::Plain,
    ) {
        if let Some(total) = boot_total(&timing) {
            ctx.fact("Boot time", total);
        }
    }
    ctx.command(
        section,
        "Slowest Units",
        &CommandSpec::new("systemd-analyze", &["blame", "--no-pager"]),
        Sensitivity::Plain,
    );

    ctx.command(
        section,
        "Boot Loader (systemd-boot)",
        &CommandSpec::new("bootctl", &["status", "--no-pager"]),
        Sensitivity::Plain,
    );
    ctx.system_file(
        section,
        "loader.conf",
        "/boot/loader/loader.conf",
        Sensitivity::Plain,
    );
    ctx.system_file(section, "GRUB Defaults", "/etc/default/grub", Sensitivity::Plain);
    ctx.system_file(
        section,
        "Kernel Command Line",
        "/proc/cmdline",
        Sensitivity::Sensitive,
    );
    ctx.system_file(
        section,
        "mkinitcpio.conf",
        "/etc/mkinitcpio.conf",
        Sensitivity::Plain,
    );
}

/// Total from `Startup finished in 3.1s (kernel) + 5.2s (userspace) = 8.3s`.
fn boot_total(analyze: &str) -> Option<String> {
    let line = analyze.lines().find(|l| l.starts_with("Startup finished"))?;
    let (_, total) = line.rsplit_once("= ")?;
    let total = total.trim();
    (!total.is_empty()).then(|| total.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{collect_module, fixture_settings, ScriptedRunner};
    use ar_report::Block;
    use std::fs;

    #[test]
    fn test_boot_total() {
        let out = "Startup finished in 3.112s (firmware) + 1.2s (kernel) + 5.4s (userspace) = 9.712s\ngraphical.target reached after 5.3s in userspace.\n";
        assert_eq!(boot_total(out).as_deref(), Some("9.712s"));
        assert_eq!(boot_total("Bootup is not yet finished."), None);
    }

    #[test]
    fn test_boot_section_caps_config_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("etc")).unwrap();
        let long: String = (0..80).map(|i| format!("# line {}\n", i)).collect();
        fs::write(tmp.path().join("etc/mkinitcpio.conf"), long).unwrap();
        let settings = fixture_settings(tmp.path(), &[]);
        let runner = ScriptedRunner::new()
            .respond(
                "systemd-analyze",
                "Startup finished in 1.2s (kernel) + 5.4s (userspace) = 6.6s\n",
            )
            .fail("bootctl status --no-pager", 1, "Failed to query EFI variables");

        let (section, facts, _) = collect_module("boot", &runner, &settings);

        assert_eq!(facts.get("Boot time"), Some("6.6s"));
        assert_eq!(section.failure_count(), 1);
        let mkinit = section
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Code { text, truncated } if text.starts_with("# line 0") => {
                    Some((text.lines().count(), *truncated))
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(mkinit, (settings.max_file_lines, true));
    }
}
