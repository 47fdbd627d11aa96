//! pacman state: counts, foreign and orphaned packages, AUR helpers,
//! pending updates, mirrors and recent transactions.

use super::{count_lines, Module};
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "packages",
    title: "Packages",
    description: "pacman package counts, foreign/orphaned packages, AUR helpers, mirrors, pacman log",
    required_commands: &["pacman"],
    basic: true,
    handler: collect,
};

const AUR_HELPERS: &[&str] = &["yay", "paru", "pikaur", "trizen", "aura"];

/// Lines of `/var/log/pacman.log` shown as recent transactions.
const RECENT_TRANSACTIONS: usize = 20;

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    counts(ctx, section);

    ctx.command(
        section,
        "Foreign Packages",
        &CommandSpec::new("pacman", &["-Qm"]).accept_exit(1),
        Sensitivity::Plain,
    );
    ctx.command(
        section,
        "Orphaned Packages",
        &CommandSpec::new("pacman", &["-Qdtq"]).accept_exit(1),
        Sensitivity::Plain,
    );

    aur_helpers(ctx, section);

    // checkupdates (pacman-contrib) exits 2 when there is nothing to update
    if let Some(updates) = ctx.command(
        section,
        "Pending Updates",
        &CommandSpec::new("checkupdates", &[]).accept_exit(2),
        Sensitivity::Plain,
    ) {
        ctx.fact("Pending updates", count_lines(&updates).to_string());
    }

    ctx.system_file(
        section,
        "pacman.conf",
        "/etc/pacman.conf",
        Sensitivity::Plain,
    );
    mirrors(ctx, section);
    recent_transactions(ctx, section);
}

fn counts(ctx: &mut ReportContext<'_>, section: &mut Section) {
    let installed = package_count(ctx, &["-Qq"]);
    let explicit = package_count(ctx, &["-Qeq"]);
    let foreign = package_count(ctx, &["-Qmq"]).unwrap_or(0);
    let orphans = package_count(ctx, &["-Qdtq"]).unwrap_or(0);

    let show = |n: Option<usize>| n.map_or_else(|| "unknown".to_string(), |n| n.to_string());
    section.subheading("Package Counts");
    section.table([
        ("Installed", show(installed)),
        ("Explicitly installed", show(explicit)),
        ("Foreign (AUR/manual)", foreign.to_string()),
        ("Orphans", orphans.to_string()),
    ]);

    if let Some(installed) = installed {
        let value = match explicit {
            Some(explicit) => format!("{} ({} explicit, {} foreign)", installed, explicit, foreign),
            None => installed.to_string(),
        };
        ctx.fact("Packages", value);
    }
}

/// Lines printed by a quiet pacman query; `None` when it printed nothing.
fn package_count(ctx: &ReportContext<'_>, args: &[&str]) -> Option<usize> {
    ctx.probe(&CommandSpec::new("pacman", args).accept_exit(1))
        .map(|out| count_lines(&out))
}

fn aur_helpers(ctx: &mut ReportContext<'_>, section: &mut Section) {
    let found: Vec<(String, String)> = AUR_HELPERS
        .iter()
        .filter(|helper| ctx.has_command(helper))
        .map(|helper| {
            let version = ctx
                .probe_line(&CommandSpec::new(helper, &["--version"]))
                .unwrap_or_else(|| "version unavailable".to_string());
            (helper.to_string(), version)
        })
        .collect();

    section.subheading("AUR Helpers");
    if found.is_empty() {
        section.text("_No AUR helper found._");
        return;
    }
    let names: Vec<&str> = found.iter().map(|(name, _)| name.as_str()).collect();
    ctx.fact("AUR helper", names.join(", "));
    section.table(found);
}

fn mirrors(ctx: &mut ReportContext<'_>, section: &mut Section) {
    let Some(mirrorlist) = ctx.read_system_file("/etc/pacman.d/mirrorlist") else {
        return;
    };
    let active = active_mirrors(&mirrorlist);
    section.subheading("Active Mirrors");
    if active.is_empty() {
        section.text("_No active mirrors in /etc/pacman.d/mirrorlist._");
    } else {
        section.code(active.join("\n"), false);
    }
}

fn recent_transactions(ctx: &mut ReportContext<'_>, section: &mut Section) {
    let Some(log) = ctx.read_system_file("/var/log/pacman.log") else {
        return;
    };
    let recent = last_transactions(&log, RECENT_TRANSACTIONS);
    if recent.is_empty() {
        return;
    }
    section.subheading("Recent Transactions");
    section.code(recent.join("\n"), false);
}

/// Uncommented `Server = ...` lines.
fn active_mirrors(mirrorlist: &str) -> Vec<&str> {
    mirrorlist
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("Server"))
        .collect()
}

/// The last `limit` install/upgrade/removal entries of a pacman log.
fn last_transactions(log: &str, limit: usize) -> Vec<&str> {
    let mut entries: Vec<&str> = log
        .lines()
        .filter(|l| {
            l.contains("[ALPM] installed")
                || l.contains("[ALPM] upgraded")
                || l.contains("[ALPM] removed")
                || l.contains("[ALPM] downgraded")
        })
        .collect();
    let skip = entries.len().saturating_sub(limit);
    entries.drain(..skip);
    entries
}
