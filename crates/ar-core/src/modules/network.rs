//! Interfaces, routes, NetworkManager, sockets and resolver configuration.
//!
//! Nearly everything here carries addresses, so most output is redacted.

use super::Module;
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "network",
    title: "Network",
    description: "interfaces, routes, NetworkManager connections, listening sockets, DNS and hosts",
    required_commands: &["ip"],
    basic: false,
    handler: collect,
};

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    if let Some(interfaces) = ctx.command(
        section,
        "Interfaces",
        &CommandSpec::new("ip", &["-brief", "address"]),
        Sensitivity::Sensitive,
    ) {
        let up = interfaces_up(&interfaces);
        if !up.is_empty() {
            ctx.fact("Interfaces up", up.join(", "));
        }
    }

    ctx.command(
        section,
        "Routes",
        &CommandSpec::new("ip", &["route"]),
        Sensitivity::Sensitive,
    );
    ctx.command(
        section,
        "NetworkManager",
        &CommandSpec::new("nmcli", &["general", "status"]),
        Sensitivity::Plain,
    );
    ctx.command(
        section,
        "Active Connections",
        &CommandSpec::new(
            "nmcli",
            &["-t", "-f", "NAME,TYPE,DEVICE", "connection", "show", "--active"],
        ),
        Sensitivity::Sensitive,
    );
    ctx.command(
        section,
        "Listening Sockets",
        &CommandSpec::new("ss", &["-tuln"]),
        Sensitivity::Sensitive,
    );
    ctx.system_file(section, "resolv.conf", "/etc/resolv.conf", Sensitivity::Sensitive);
    ctx.system_file(section, "hosts", "/etc/hosts", Sensitivity::Sensitive);
}

/// Names of non-loopback interfaces in state UP in `ip -brief address` output.
fn interfaces_up(brief: &str) -> Vec<String> {
    brief
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let state = fields.next()?;
            (state == "UP" && name != "lo").then(|| name.to_string())
        })
        .collect()
}
