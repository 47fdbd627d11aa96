//! Toolchain versions and global git configuration.

use super::{version_table, Module};
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "development",
    title: "Development",
    description: "compiler and runtime versions, container tooling, global git configuration",
    required_commands: &[],
    basic: false,
    handler: collect,
};

fn toolchains() -> Vec<(&'static str, CommandSpec)> {
    vec![
        ("git", CommandSpec::new("git", &["--version"])),
        ("gcc", CommandSpec::new("gcc", &["--version"])),
        ("clang", CommandSpec::new("clang", &["--version"])),
        ("make", CommandSpec::new("make", &["--version"])),
        ("rustc", CommandSpec::new("rustc", &["--version"])),
        ("cargo", CommandSpec::new("cargo", &["--version"])),
        ("go", CommandSpec::new("go", &["version"])),
        ("python", CommandSpec::new("python3", &["--version"])),
        ("node", CommandSpec::new("node", &["--version"])),
        ("npm", CommandSpec::new("npm", &["--version"])),
        ("java", CommandSpec::new("java", &["-version"]).with_stderr()),
        ("docker", CommandSpec::new("docker", &["--version"])),
        ("podman", CommandSpec::new("podman", &["--version"])),
    ]
}

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    let found = version_table(ctx, section, "Toolchains", &toolchains());
    if !found.is_empty() {
        ctx.fact("Toolchains", found.join(", "));
    }

    // git exits 1 when there is no global config file
    ctx.command(
        section,
        "Git Global Configuration",
        &CommandSpec::new("git", &["config", "--global", "--list"]).accept_exit(1),
        Sensitivity::Sensitive,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{collect_module, fixture_settings, ScriptedRunner};
    use ar_report::Block;

    #[test]
    fn test_development_section() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = fixture_settings(tmp.path(), &[]);
        let runner = ScriptedRunner::new()
            .respond("git --version", "git version 2.46.0\n")
            .respond("rustc --version", "rustc 1.81.0 (eeb90cda1 2024-09-04)\n")
            .respond(
                "git config --global --list",
                "user.name=Alice\nuser.email=alice@example.org\ncredential.helper=store\n",
            );

        let (section, facts, stats) = collect_module("development", &runner, &settings);

        assert_eq!(facts.get("Toolchains"), Some("git, rustc"));
        // only the address is sensitive here
        assert_eq!(stats.total_hits(), 1);
        assert!(section.blocks.iter().any(|b| matches!(
            b,
            Block::Code { text, .. } if text.contains("user.email=<EMAIL>")
        )));
    }

    #[test]
    fn test_java_version_from_stderr() {
        let java = toolchains()
            .into_iter()
            .find(|(label, _)| *label == "java")
            .map(|(_, spec)| spec)
            .unwrap();
        assert!(java.merge_stderr);
    }
}
