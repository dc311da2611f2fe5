// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pertdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pertdag",
    version,
    about = "Compute PERT/CPM schedules and critical paths for task diagrams.",
    long_about = None
)]
pub struct CliArgs {
    /// Diagram file to schedule (JSON export: `tasks` + `edges`).
    #[arg(value_name = "DIAGRAM")]
    pub input: PathBuf,

    /// Path to the config file (TOML).
    ///
    /// If omitted, `Pertdag.toml` in the current directory is used when
    /// present, built-in defaults otherwise.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report format; overrides `[report].format`.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// Write the scheduled diagram (with ES/EF/LS/LF) to this file.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PERTDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the diagram, but don't schedule it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Report format as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for crate::types::ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => crate::types::ReportFormat::Text,
            FormatArg::Json => crate::types::ReportFormat::Json,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
