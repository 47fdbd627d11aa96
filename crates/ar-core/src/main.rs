//! arch-report CLI entry point.

use ar_core::config::{load_config, CliOverrides};
use ar_core::exit_codes::ExitCode;
use ar_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use ar_core::{
    CollectSettings, GenerateError, ModuleRegistry, ModuleSelection, ReportGenerator,
    SystemRunner,
};
use ar_report::ReportError;
use clap::{Args, Parser};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "arch-report")]
#[command(author, version, about = "Generate a Markdown system report for an Arch Linux machine", long_about = None)]
struct Cli {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Directory the report is written to
    #[arg(long, short = 'o', value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/arch-report/config.toml, or $ARCH_REPORT_CONFIG)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep only the N newest reports in the output directory
    #[arg(long, value_name = "N")]
    keep: Option<usize>,

    /// Write command output without redacting sensitive data
    #[arg(long)]
    no_redact: bool,

    /// List available modules and exit
    #[arg(long)]
    list_modules: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Log format on stderr: human or jsonl
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

/// Module selection; at most one of these may be given.
#[derive(Args, Debug)]
#[group(multiple = false)]
struct SelectionArgs {
    /// Only the basic modules (system, hardware, packages, services)
    #[arg(long)]
    basic: bool,

    /// All modules (default)
    #[arg(long)]
    full: bool,

    /// Comma-separated list of modules, e.g. --modules=hardware,network
    #[arg(long, value_name = "LIST")]
    modules: Option<String>,
}

impl SelectionArgs {
    fn selection(&self) -> ModuleSelection {
        match (&self.modules, self.basic) {
            (Some(list), _) => ModuleSelection::from_list(list),
            (None, true) => ModuleSelection::Basic,
            (None, false) => ModuleSelection::Full,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.verbose, cli.quiet),
        cli.log_format,
    );
    init_logging(&log_config);

    let exit_code = if cli.list_modules {
        list_modules()
    } else {
        run(&cli)
    };

    std::process::exit(exit_code.as_i32());
}

fn list_modules() -> ExitCode {
    let registry = ModuleRegistry::builtin();
    let width = registry.iter().map(|m| m.id.len()).max().unwrap_or(0);
    for module in registry.iter() {
        let mut line = format!("{:width$}  {}", module.id, module.description, width = width);
        if module.basic {
            line.push_str(" [basic]");
        }
        if !module.required_commands.is_empty() {
            line.push_str(&format!(" (requires: {})", module.required_commands.join(", ")));
        }
        println!("{}", line);
    }
    ExitCode::Clean
}

fn run(cli: &Cli) -> ExitCode {
    let loaded = match load_config(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %e, "configuration error");
            eprintln!("arch-report: {}", e);
            return ExitCode::ArgsError;
        }
    };
    info!(source = %loaded.source, "configuration resolved");

    let mut config = loaded.config;
    config.apply_overrides(&CliOverrides {
        output_dir: cli.output_dir.clone(),
        keep_reports: cli.keep,
        no_redact: cli.no_redact,
    });
    if let Err(e) = config.validate() {
        eprintln!("arch-report: {}", e);
        return ExitCode::ArgsError;
    }

    let filter = match config.redaction_filter() {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("arch-report: {}", e);
            return ExitCode::ArgsError;
        }
    };

    let registry = ModuleRegistry::builtin();
    let runner = SystemRunner::new(config.max_output_bytes);
    let settings = CollectSettings::from_config(&config);
    let report = config.report_config();
    let generator = ReportGenerator::new(&registry, &runner, &filter, &settings, &report);

    match generator.generate(&cli.selection.selection()) {
        Ok(summary) => {
            println!("{}", summary.path.display());
            ExitCode::Clean
        }
        Err(GenerateError::Selection(e)) => {
            eprintln!("arch-report: {}", e);
            ExitCode::ArgsError
        }
        Err(GenerateError::Report(ReportError::InvalidConfig(msg))) => {
            eprintln!("arch-report: {}", msg);
            ExitCode::ArgsError
        }
        Err(GenerateError::Report(e)) => {
            error!(error = %e, "failed to write report");
            eprintln!("arch-report: {}", e);
            ExitCode::IoError
        }
    }
}
