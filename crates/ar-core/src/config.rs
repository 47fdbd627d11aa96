//! Configuration file loading and resolution.
//!
//! Resolution order: `--config` → `ARCH_REPORT_CONFIG` →
//! `$XDG_CONFIG_HOME/arch-report/config.toml` → built-in defaults.
//!
//! An explicitly named file (CLI or environment) must exist; the XDG file is
//! optional.

use ar_redact::{RedactionError, RedactionFilter, RedactionPolicy};
use ar_report::ReportConfig;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the config file.
pub const ENV_CONFIG_PATH: &str = "ARCH_REPORT_CONFIG";

/// Application name for XDG directories.
const APP_NAME: &str = "arch-report";

/// Standard config file name.
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_MAX_FILE_LINES: usize = 200;
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 256 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Redaction(#[from] RedactionError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where the configuration came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via `--config`.
    CliArgument,
    /// Set via `ARCH_REPORT_CONFIG`.
    Environment,
    /// Found in the XDG config directory.
    XdgConfig,
    /// No file; built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Report directory; the current directory when unset.
    pub output_dir: Option<PathBuf>,
    pub title: String,
    pub file_prefix: String,
    /// Keep at most this many reports; all are kept when unset.
    pub keep_reports: Option<usize>,
    /// Lines of a configuration file copied into the report.
    pub max_file_lines: usize,
    /// Per-stream byte cap for captured command output.
    pub max_output_bytes: usize,
    pub redaction: RedactionPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        let report = ReportConfig::default();
        Self {
            output_dir: None,
            title: report.title,
            file_prefix: report.file_prefix,
            keep_reports: None,
            max_file_lines: DEFAULT_MAX_FILE_LINES,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            redaction: RedactionPolicy::default(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub keep_reports: Option<usize>,
    pub no_redact: bool,
}

impl AppConfig {
    /// Parse a TOML document. `path` is used for error messages only.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_file_lines == 0 {
            return Err(ConfigError::Invalid(
                "max_file_lines must be at least 1".to_string(),
            ));
        }
        if self.max_output_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_output_bytes must be at least 1".to_string(),
            ));
        }
        self.report_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn apply_overrides(&mut self, cli: &CliOverrides) {
        if let Some(dir) = &cli.output_dir {
            self.output_dir = Some(dir.clone());
        }
        if let Some(keep) = cli.keep_reports {
            self.keep_reports = Some(keep);
        }
        if cli.no_redact {
            self.redaction.enabled = false;
        }
    }

    /// Output settings for the report writer.
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            title: self.title.clone(),
            file_prefix: self.file_prefix.clone(),
            output_dir: self
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
            keep_reports: self.keep_reports,
        }
    }

    /// Build the redaction filter; disabled redaction yields the identity filter.
    pub fn redaction_filter(&self) -> Result<RedactionFilter> {
        Ok(self.redaction.build()?)
    }
}

/// A loaded configuration together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Default XDG location of the config file.
pub fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join(CONFIG_FILENAME))
}

/// Pick the config file to load.
///
/// Returns the path and its source, or `None` for built-in defaults.
pub fn resolve_config_path(
    cli_path: Option<&Path>,
    env_value: Option<OsString>,
    xdg_path: Option<PathBuf>,
) -> Result<Option<(PathBuf, ConfigSource)>> {
    if let Some(path) = cli_path {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return Ok(Some((path.to_path_buf(), ConfigSource::CliArgument)));
    }

    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        let path = PathBuf::from(value);
        if !path.is_file() {
            return Err(ConfigError::NotFound(path));
        }
        return Ok(Some((path, ConfigSource::Environment)));
    }

    if let Some(path) = xdg_path {
        if path.is_file() {
            return Ok(Some((path, ConfigSource::XdgConfig)));
        }
        debug!(path = %path.display(), "no config file at XDG location");
    }

    Ok(None)
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    AppConfig::from_toml(&content, path)
}

/// Resolve and load the configuration using the process environment.
pub fn load_config(cli_path: Option<&Path>) -> Result<LoadedConfig> {
    let resolved = resolve_config_path(
        cli_path,
        std::env::var_os(ENV_CONFIG_PATH),
        xdg_config_path(),
    )?;

    match resolved {
        Some((path, source)) => {
            let config = load_from_path(&path)?;
            debug!(path = %path.display(), %source, "configuration loaded");
            Ok(LoadedConfig {
                config,
                path: Some(path),
                source,
            })
        }
        None => Ok(LoadedConfig {
            config: AppConfig::default(),
            path: None,
            source: ConfigSource::BuiltinDefault,
        }),
    }
}
