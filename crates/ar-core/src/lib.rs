//! arch-report core library.
//!
//! This library provides the collector side of arch-report:
//! - Exit codes for CLI operations
//! - Configuration loading and validation
//! - Logging setup
//! - Command execution behind the [`runner::CommandRunner`] trait
//! - Report modules, module selection and the generator loop
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod context;
pub mod exit_codes;
pub mod generator;
pub mod logging;
pub mod modules;
pub mod runner;
pub mod selection;

// Re-export test utilities for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{AppConfig, ConfigError, ConfigSource, LoadedConfig};
pub use context::{CollectSettings, ReportContext, Sensitivity};
pub use exit_codes::ExitCode;
pub use generator::{GenerateError, GenerationSummary, ReportGenerator};
pub use modules::{Module, ModuleRegistry};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, RunError, SystemRunner};
pub use selection::{ModuleSelection, SelectionError};
