//! Filesystem usage, block device filesystems, swap and fstab.

use super::Module;
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "storage",
    title: "Storage",
    description: "filesystem usage, filesystems per block device, swap, fstab",
    required_commands: &["df"],
    basic: false,
    handler: collect,
};

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    ctx.command(
        section,
        "Filesystem Usage",
        &CommandSpec::new(
            "df",
            &["-h", "-x", "tmpfs", "-x", "devtmpfs", "-x", "efivarfs"],
        ),
        Sensitivity::Sensitive,
    );
    if let Some(root) = ctx.probe(&CommandSpec::new("df", &["-h", "/"])) {
        if let Some(usage) = root_usage(&root) {
            ctx.fact("Root filesystem", usage);
        }
    }

    ctx.command(
        section,
        "Filesystems",
        &CommandSpec::new("lsblk", &["-f"]),
        Sensitivity::Sensitive,
    );
    ctx.command(
        section,
        "Swap",
        &CommandSpec::new("swapon", &["--show"]),
        Sensitivity::Plain,
    );
    ctx.system_file(section, "fstab", "/etc/fstab", Sensitivity::Sensitive);
}

/// "41% of 100G used" from `df -h /`.
fn root_usage(df: &str) -> Option<String> {
    let row = df.lines().nth(1)?;
    let fields: Vec<&str> = row.split_whitespace().collect();
    let size = fields.get(1)?;
    let percent = fields.get(4)?;
    Some(format!("{} of {} used", percent, size))
}
