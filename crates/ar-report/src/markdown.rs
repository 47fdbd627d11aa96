//! Markdown rendering.
//!
//! Top-level module sections render as `## Title`, subsections as `###`.
//! Every rendered chunk ends with a blank line so chunks can be appended
//! to the report one after another.

use crate::document::{Block, ModuleStatus, ReportHeader, ReportSummary, Section};
use std::fmt::Write;

/// Heading used for the closing summary section.
pub const SUMMARY_TITLE: &str = "Summary";

pub fn render_header(header: &ReportHeader) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", header.title);
    if let Some(host) = &header.hostname {
        let _ = writeln!(out, "- **Host:** {}", host);
    }
    let _ = writeln!(
        out,
        "- **Generated:** {}",
        header.generated_at.format("%Y-%m-%d %H:%M:%S %z")
    );
    let _ = writeln!(out, "- **Generator:** arch-report {}", header.generator_version);
    let _ = writeln!(out, "- **Modules:** {}", header.modules.join(", "));
    let _ = writeln!(
        out,
        "- **Redaction:** {}",
        if header.redaction_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    out.push('\n');
    out
}

pub fn render_section(section: &Section) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {}\n", section.title);
    for block in &section.blocks {
        render_block(&mut out, block);
    }
    out
}

fn render_block(out: &mut String, block: &Block) {
    match block {
        Block::Subheading { title } => {
            let _ = writeln!(out, "### {}\n", title);
        }
        Block::Code { text, truncated } => {
            let fence = fence_for(text);
            let _ = writeln!(out, "{}text", fence);
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
            let _ = writeln!(out, "{}", fence);
            if *truncated {
                out.push_str("\n_Output truncated._\n");
            }
            out.push('\n');
        }
        Block::Table { rows } => {
            out.push_str("| Item | Value |\n|------|-------|\n");
            for (label, value) in rows {
                let _ = writeln!(out, "| {} | {} |", escape_cell(label), escape_cell(value));
            }
            out.push('\n');
        }
        Block::Text { text } => {
            let _ = writeln!(out, "{}\n", text);
        }
        Block::NotInstalled { command } => {
            let _ = writeln!(out, "_Not available: `{}` is not installed._\n", command);
        }
        Block::Failed { command, reason } => {
            let _ = writeln!(out, "_Error executing `{}`: {}_\n", command, single_line(reason));
        }
    }
}

pub fn render_summary(summary: &ReportSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {}\n", SUMMARY_TITLE);

    if !summary.facts.is_empty() {
        out.push_str("### Quick Facts\n\n| Item | Value |\n|------|-------|\n");
        for (label, value) in summary.facts.iter() {
            let _ = writeln!(out, "| {} | {} |", escape_cell(label), escape_cell(value));
        }
        out.push('\n');
    }

    out.push_str("### Modules\n\n");
    for outcome in &summary.outcomes {
        match &outcome.status {
            ModuleStatus::Written { failures: 0 } => {
                let _ = writeln!(out, "- {}: written", outcome.id);
            }
            ModuleStatus::Written { failures } => {
                let _ = writeln!(
                    out,
                    "- {}: written ({} command error{})",
                    outcome.id,
                    failures,
                    if *failures == 1 { "" } else { "s" }
                );
            }
            ModuleStatus::Skipped { missing } => {
                let _ = writeln!(
                    out,
                    "- {}: skipped (missing: {})",
                    outcome.id,
                    missing.join(", ")
                );
            }
        }
    }
    out.push('\n');

    if summary.redaction_enabled {
        let _ = writeln!(out, "Redactions applied: {}", summary.redactions);
    } else {
        out.push_str("Redaction disabled for this report.\n");
    }
    let _ = writeln!(out, "Generated in {} ms.", summary.duration_ms);
    out
}

/// Top-level (`## `) headings outside fenced blocks, in document order.
pub fn top_level_headings(markdown: &str) -> Vec<String> {
    let mut headings = Vec::new();
    let mut fence: Option<String> = None;
    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if let Some(open) = &fence {
            if trimmed.trim_end() == open.as_str() {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            let marker = trimmed.chars().next().unwrap_or('`');
            let width = trimmed.chars().take_while(|c| *c == marker).count();
            fence = Some(marker.to_string().repeat(width));
            continue;
        }
        if let Some(title) = line.strip_prefix("## ") {
            headings.push(title.trim().to_string());
        }
    }
    headings
}

/// A backtick fence longer than any backtick run inside `text`.
fn fence_for(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn escape_cell(value: &str) -> String {
    single_line(value).replace('|', "\\|")
}

fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ModuleOutcome, QuickFacts};
    use chrono::{Local, TimeZone};

    fn header() -> ReportHeader {
        ReportHeader {
            title: "Arch Linux System Report".to_string(),
            hostname: Some("archbox".to_string()),
            generated_at: Local.with_ymd_and_hms(2026, 10, 19, 12, 30, 0).unwrap(),
            generator_version: "0.1.0".to_string(),
            modules: vec!["system".to_string(), "hardware".to_string()],
            redaction_enabled: true,
        }
    }

    #[test]
    fn test_header() {
        let md = render_header(&header());
        assert!(md.starts_with("# Arch Linux System Report\n\n"));
        assert!(md.contains("- **Host:** archbox\n"));
        assert!(md.contains("- **Generated:** 2026-10-19 12:30:00"));
        assert!(md.contains("- **Modules:** system, hardware\n"));
        assert!(md.contains("- **Redaction:** enabled\n"));
        assert!(md.ends_with("\n\n"));
    }

    #[test]
    fn test_section_blocks() {
        let mut section = Section::new("hardware", "Hardware");
        section.subheading("CPU");
        section.code("Model name: Ryzen", false);
        section.not_installed("lsusb");
        section.failed("sensors", "exit status 1:\nNo sensors found!");
        section.table([("Memory", "32 GiB | DDR5")]);

        let md = render_section(&section);
        assert!(md.starts_with("## Hardware\n\n### CPU\n\n```text\nModel name: Ryzen\n```\n\n"));
        assert!(md.contains("_Not available: `lsusb` is not installed._"));
        assert!(md.contains("_Error executing `sensors`: exit status 1: No sensors found!_"));
        assert!(md.contains("| Memory | 32 GiB \\| DDR5 |"));
    }

    #[test]
    fn test_code_fence_outgrows_content() {
        let mut section = Section::new("shell", "Shell");
        section.code("echo ```nested```", true);
        let md = render_section(&section);
        assert!(md.contains("````text\necho ```nested```\n````\n"));
        assert!(md.contains("_Output truncated._"));
    }

    #[test]
    fn test_summary() {
        let mut facts = QuickFacts::new();
        facts.record("Kernel", "6.9.7-arch1-1");
        let summary = ReportSummary {
            facts,
            outcomes: vec![
                ModuleOutcome {
                    id: "hardware".to_string(),
                    title: "Hardware".to_string(),
                    status: ModuleStatus::Written { failures: 2 },
                },
                ModuleOutcome {
                    id: "packages".to_string(),
                    title: "Packages".to_string(),
                    status: ModuleStatus::Skipped {
                        missing: vec!["pacman".to_string()],
                    },
                },
            ],
            redaction_enabled: true,
            redactions: 7,
            duration_ms: 42,
        };
        let md = render_summary(&summary);
        assert!(md.starts_with("## Summary\n\n### Quick Facts\n"));
        assert!(md.contains("| Kernel | 6.9.7-arch1-1 |"));
        assert!(md.contains("- hardware: written (2 command errors)"));
        assert!(md.contains("- packages: skipped (missing: pacman)"));
        assert!(md.contains("Redactions applied: 7"));
    }

    #[test]
    fn test_top_level_headings_skip_fences() {
        let md = "# Title\n\n## Hardware\n\n```text\n## not a heading\n```\n\n### Sub\n\n## Summary\n";
        assert_eq!(top_level_headings(md), vec!["Hardware", "Summary"]);
    }

    #[test]
    fn test_top_level_headings_long_fence() {
        let md = "## A\n````text\n```\n## inner\n```\n````\n## B\n";
        assert_eq!(top_level_headings(md), vec!["A", "B"]);
    }
}
