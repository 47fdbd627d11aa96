//! Exit codes for the arch-report CLI.
//!
//! Exit code ranges:
//! - 0: report written
//! - 10: user/environment errors (bad flags, bad config)
//! - 21: report could not be written
//!
//! Usage errors detected by clap itself (unknown flag, conflicting
//! selection flags) exit with clap's own code 2.

/// Exit codes for arch-report runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report written (or module list printed).
    Clean = 0,

    /// Invalid arguments or configuration: unknown module name, empty
    /// selection, unreadable or invalid config file.
    ArgsError = 10,

    /// Report file or output directory could not be written.
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Check if this exit code indicates any error.
    pub fn is_error(self) -> bool {
        self != ExitCode::Clean
    }

    /// Get the error code name as a string constant (for log fields).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
