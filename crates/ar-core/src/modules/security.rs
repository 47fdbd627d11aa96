//! Firewall, SSH daemon and kernel security modules.

use super::Module;
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "security",
    title: "Security",
    description: "firewall status, SSH daemon state and configuration, active LSMs",
    required_commands: &[],
    basic: false,
    handler: collect,
};

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    ctx.command(
        section,
        "Firewall (ufw)",
        &CommandSpec::new("ufw", &["status", "verbose"]),
        Sensitivity::Sensitive,
    );
    ctx.command(
        section,
        "Firewall (firewalld)",
        &CommandSpec::new("firewall-cmd", &["--state"]),
        Sensitivity::Plain,
    );

    // is-active exits 3 for an inactive unit and 4 for an unknown one
    if let Some(state) = ctx.command(
        section,
        "SSH Daemon",
        &CommandSpec::new("systemctl", &["is-active", "sshd"])
            .accept_exit(3)
            .accept_exit(4),
        Sensitivity::Plain,
    ) {
        ctx.fact("SSH daemon", state.trim());
    }
    ctx.system_file(
        section,
        "sshd_config",
        "/etc/ssh/sshd_config",
        Sensitivity::Sensitive,
    );

    if let Some(lsm) = ctx.read_system_file("/sys/kernel/security/lsm") {
        let lsm = lsm.trim().trim_end_matches(',').to_string();
        if !lsm.is_empty() {
            section.subheading("Linux Security Modules");
            section.code(lsm.replace(',', ", "), false);
            ctx.fact("LSMs", lsm.replace(',', ", "));
        }
    }
}
