//! Graphical session, Xfce and GTK settings.

use super::Module;
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "desktop",
    title: "Desktop Environment",
    description: "session variables, display manager, Xfce and GTK settings, window manager",
    required_commands: &[],
    basic: false,
    handler: collect,
};

const SESSION_VARS: &[&str] = &[
    "XDG_CURRENT_DESKTOP",
    "XDG_SESSION_DESKTOP",
    "DESKTOP_SESSION",
    "XDG_SESSION_TYPE",
    "WAYLAND_DISPLAY",
    "DISPLAY",
];

const XFCE_CHANNELS: &[(&str, &str)] = &[
    ("Xfce Appearance (xsettings)", "xsettings"),
    ("Xfce Window Manager (xfwm4)", "xfwm4"),
    ("Xfce Panel", "xfce4-panel"),
];

const GTK_KEYS: &[&str] = &[
    "gtk-theme",
    "icon-theme",
    "cursor-theme",
    "font-name",
    "color-scheme",
];

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    session(ctx, section);

    for &(title, channel) in XFCE_CHANNELS {
        ctx.command(
            section,
            title,
            &CommandSpec::new("xfconf-query", &["-c", channel, "-lv"]),
            Sensitivity::Sensitive,
        );
    }

    gtk_settings(ctx, section);

    ctx.command(
        section,
        "Window Manager",
        &CommandSpec::new("wmctrl", &["-m"]),
        Sensitivity::Plain,
    );
    ctx.home_file(
        section,
        "GTK 3 settings.ini",
        ".config/gtk-3.0/settings.ini",
        Sensitivity::Sensitive,
    );
}

fn session(ctx: &mut ReportContext<'_>, section: &mut Section) {
    let mut rows: Vec<(String, String)> = SESSION_VARS
        .iter()
        .filter_map(|var| ctx.env_var(var).map(|value| (var.to_string(), value)))
        .collect();
    if let Some(dm) = display_manager(ctx) {
        rows.push(("Display manager".to_string(), dm));
    }

    let desktop = ctx
        .env_var("XDG_CURRENT_DESKTOP")
        .or_else(|| ctx.env_var("DESKTOP_SESSION"));
    if let Some(desktop) = desktop {
        let value = match ctx.env_var("XDG_SESSION_TYPE") {
            Some(kind) => format!("{} ({})", desktop, kind),
            None => desktop,
        };
        ctx.fact("Desktop", value);
    }

    section.subheading("Session");
    if rows.is_empty() {
        section.text("_No graphical session detected._");
    } else {
        section.table(rows);
    }
}

/// Unit name behind the `display-manager.service` alias, e.g. `lightdm`.
fn display_manager(ctx: &ReportContext<'_>) -> Option<String> {
    let link = ctx
        .settings()
        .system_path("/etc/systemd/system/display-manager.service");
    let target = std::fs::read_link(link).ok()?;
    let name = target.file_name()?.to_str()?;
    Some(name.trim_end_matches(".service").to_string())
}

fn gtk_settings(ctx: &mut ReportContext<'_>, section: &mut Section) {
    section.subheading("GTK Settings (gsettings)");
    if !ctx.has_command("gsettings") {
        section.not_installed("gsettings");
        return;
    }
    let rows: Vec<(String, String)> = GTK_KEYS
        .iter()
        .map(|&key| {
            let value = ctx
                .probe(&CommandSpec::new(
                    "gsettings",
                    &["get", "org.gnome.desktop.interface", key],
                ))
                .map(|v| v.trim_matches('\'').to_string())
                .unwrap_or_else(|| "unavailable".to_string());
            (key.to_string(), value)
        })
        .collect();
    section.table(rows);
}
