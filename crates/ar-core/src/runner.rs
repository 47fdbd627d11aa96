//! External command execution.
//!
//! Every collector goes through [`CommandRunner`], so handlers can be driven
//! by a scripted runner in tests. The system runner:
//!
//! - resolves programs on `PATH`
//! - rejects names containing shell metacharacters
//! - runs with stdin closed and `LC_ALL=C` for stable, parseable output
//! - caps captured stdout and stderr
//!
//! Execution is blocking with no timeout.

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors from running a command.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("command not found: {0}")]
    NotFound(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("exit status {code}{}", stderr_suffix(.stderr))]
    NonZeroExit { code: i32, stderr: String },

    #[error("killed by signal {signal}")]
    KilledBySignal { signal: i32 },
}

fn stderr_suffix(stderr: &str) -> String {
    match stderr.lines().map(str::trim).find(|l| !l.is_empty()) {
        Some(line) => format!(": {}", line),
        None => String::new(),
    }
}

/// A command line to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Exit codes treated as success.
    pub ok_exit_codes: Vec<i32>,
    /// Append stderr to the displayed output.
    pub merge_stderr: bool,
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            ok_exit_codes: vec![0],
            merge_stderr: false,
        }
    }

    /// Also accept `code` as success (`pacman -Qdtq` exits 1 when nothing matches).
    pub fn accept_exit(mut self, code: i32) -> Self {
        if !self.ok_exit_codes.contains(&code) {
            self.ok_exit_codes.push(code);
        }
        self
    }

    /// Show stderr together with stdout (`java -version` prints to stderr).
    pub fn with_stderr(mut self) -> Self {
        self.merge_stderr = true;
        self
    }

    /// The command line as shown in the report.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Map a finished process to success or [`RunError::NonZeroExit`].
    pub fn check_exit(&self, output: CommandOutput) -> Result<CommandOutput, RunError> {
        match output.exit_code {
            Some(code) if self.ok_exit_codes.contains(&code) => Ok(output),
            Some(code) => Err(RunError::NonZeroExit {
                code,
                stderr: output.stderr,
            }),
            None => Ok(output),
        }
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Captured result of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    /// Either stream hit the byte cap.
    pub truncated: bool,
    pub duration: Duration,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code: Some(0),
            ..Default::default()
        }
    }

    /// Text to display: stdout, plus stderr when the spec asks for it.
    pub fn text(&self, merge_stderr: bool) -> String {
        if !merge_stderr || self.stderr.is_empty() {
            return self.stdout.clone();
        }
        if self.stdout.is_empty() {
            return self.stderr.clone();
        }
        let mut text = self.stdout.clone();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text
    }
}

/// Something that can look up and run commands.
pub trait CommandRunner {
    /// Whether `program` can be run.
    fn exists(&self, program: &str) -> bool;

    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, RunError>;
}

/// Runs real processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    max_output_bytes: usize,
}

impl SystemRunner {
    pub fn new(max_output_bytes: usize) -> Self {
        Self { max_output_bytes }
    }

    fn build_command(&self, path: &std::path::Path, spec: &CommandSpec) -> Command {
        let mut command = Command::new(path);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("LC_ALL", "C")
            .env("LANG", "C");
        command
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_OUTPUT_BYTES)
    }
}

impl CommandRunner for SystemRunner {
    fn exists(&self, program: &str) -> bool {
        validate_command(program).is_ok() && which::which(program).is_ok()
    }

    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, RunError> {
        validate_command(&spec.program)?;
        let path =
            which::which(&spec.program).map_err(|_| RunError::NotFound(spec.program.clone()))?;

        trace!(command = %spec, "running");
        let start = Instant::now();
        let output = self
            .build_command(&path, spec)
            .output()
            .map_err(|source| RunError::Spawn {
                command: spec.display(),
                source,
            })?;
        let duration = start.elapsed();

        let (stdout, stdout_cut) = cap_output(&output.stdout, self.max_output_bytes);
        let (stderr, stderr_cut) = cap_output(&output.stderr, self.max_output_bytes);
        debug!(
            command = %spec,
            exit_code = ?output.status.code(),
            duration_ms = duration.as_millis() as u64,
            stdout_bytes = output.stdout.len(),
            "command finished"
        );

        if output.status.code().is_none() {
            if let Some(signal) = exit_signal(&output.status) {
                return Err(RunError::KilledBySignal { signal });
            }
        }

        spec.check_exit(CommandOutput {
            stdout,
            stderr,
            exit_code: output.status.code(),
            truncated: stdout_cut || stderr_cut,
            duration,
        })
    }
}

#[cfg(unix)]
fn exit_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}

/// Reject empty names and names with shell metacharacters.
pub fn validate_command(program: &str) -> Result<(), RunError> {
    if program.trim().is_empty() {
        return Err(RunError::InvalidCommand("empty command name".to_string()));
    }
    if program.contains(['|', '&', ';', '$', '`', '<', '>', '\n', '\r', ' ']) {
        return Err(RunError::InvalidCommand(format!(
            "command contains shell metacharacters: {}",
            program
        )));
    }
    Ok(())
}

/// Decode `bytes` lossily, keeping at most `max` bytes.
fn cap_output(bytes: &[u8], max: usize) -> (String, bool) {
    if bytes.len() <= max {
        return (String::from_utf8_lossy(bytes).into_owned(), false);
    }
    let mut cut = &bytes[..max];
    // Cut at the last complete line.
    if let Some(pos) = cut.iter().rposition(|&b| b == b'\n') {
        cut = &cut[..=pos];
    }
    (String::from_utf8_lossy(cut).into_owned(), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_command() {
        assert!(validate_command("pacman").is_ok());
        assert!(validate_command("/usr/bin/lscpu").is_ok());
        assert!(validate_command("").is_err());
        assert!(validate_command("ls; rm -rf /").is_err());
        assert!(validate_command("echo $HOME").is_err());
        assert!(validate_command("a|b").is_err());
    }

    #[test]
    fn test_spec_display_and_builders() {
        let spec = CommandSpec::new("pacman", &["-Qdtq"]).accept_exit(1).accept_exit(1);
        assert_eq!(spec.display(), "pacman -Qdtq");
        assert_eq!(spec.ok_exit_codes, vec![0, 1]);
        assert_eq!(CommandSpec::new("lscpu", &[]).to_string(), "lscpu");
    }

    #[test]
    fn test_check_exit() {
        let spec = CommandSpec::new("pacman", &["-Qdtq"]).accept_exit(1);
        let out = CommandOutput {
            exit_code: Some(1),
            ..Default::default()
        };
        assert!(spec.check_exit(out).is_ok());

        let out = CommandOutput {
            exit_code: Some(2),
            stderr: "\nerror: no database\n".to_string(),
            ..Default::default()
        };
        let err = spec.check_exit(out).unwrap_err();
        assert_eq!(err.to_string(), "exit status 2: error: no database");
    }

    #[test]
    fn test_output_text_merge() {
        let out = CommandOutput {
            stdout: "a".to_string(),
            stderr: "b\n".to_string(),
            ..Default::default()
        };
        assert_eq!(out.text(false), "a");
        assert_eq!(out.text(true), "a\nb\n");

        let only_err = CommandOutput {
            stderr: "openjdk 21\n".to_string(),
            ..Default::default()
        };
        assert_eq!(only_err.text(true), "openjdk 21\n");
    }

    #[test]
    fn test_cap_output() {
        let (text, cut) = cap_output(b"short\n", 100);
        assert_eq!(text, "short\n");
        assert!(!cut);

        let (text, cut) = cap_output(b"line one\nline two\nline three\n", 12);
        assert_eq!(text, "line one\n");
        assert!(cut);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_missing_command() {
        let runner = SystemRunner::default();
        assert!(!runner.exists("definitely-not-a-real-command-ar"));
        let err = runner
            .run(&CommandSpec::new("definitely-not-a-real-command-ar", &[]))
            .unwrap_err();
        assert!(matches!(err, RunError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_runs_true_and_false() {
        let runner = SystemRunner::default();
        if !runner.exists("true") || !runner.exists("false") {
            return;
        }
        assert!(runner.run(&CommandSpec::new("true", &[])).is_ok());
        let err = runner.run(&CommandSpec::new("false", &[])).unwrap_err();
        assert!(matches!(err, RunError::NonZeroExit { code: 1, .. }));
        assert!(runner
            .run(&CommandSpec::new("false", &[]).accept_exit(1))
            .is_ok());
    }
}
