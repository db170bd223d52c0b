//! CLI argument structures.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::styles::{AFTER_HELP, get_styles};

/// Log verbosity level for CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors (default)
    #[default]
    Error,
    /// Show warnings and errors
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Color output mode for CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// Automatically detect if output is a terminal
    #[default]
    Auto,
    /// Always output with colors
    Always,
    /// Never output with colors
    Never,
}

/// Contact Terminal - leave a message from the command line
///
/// If no subcommand is specified, starts the guided contact form.
#[derive(Parser, Debug)]
#[command(name = "contact-terminal")]
#[command(author, version)]
#[command(about = "Contact Terminal - leave a message from the command line", long_about = None)]
#[command(styles = get_styles(), after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to the config file (default: ~/.contact-terminal/config.toml)
    #[arg(long = "config", short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (same as --log-level debug)
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Enable trace-level logging
    #[arg(long = "trace", global = true)]
    pub trace: bool,

    /// Control colored output
    #[arg(long = "color", global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[clap(flatten)]
    pub session: SessionArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Effective log level.
    ///
    /// `--trace` wins over `--verbose`, which wins over `CONTACT_LOG_LEVEL`,
    /// which wins over `--log-level`.
    pub fn effective_log_level(&self, env_level: Option<&str>) -> LogLevel {
        if self.trace {
            LogLevel::Trace
        } else if self.verbose {
            LogLevel::Debug
        } else if let Some(level) = env_level.and_then(LogLevel::from_str_loose) {
            level
        } else {
            self.session.log_level
        }
    }
}

/// Arguments for the contact session.
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// Print lines whole instead of revealing them character by character
    #[arg(long = "instant", help_heading = "Display")]
    pub instant: bool,

    /// Delay between revealed characters, in milliseconds
    #[arg(long = "char-delay-ms", value_name = "MS", help_heading = "Display")]
    pub char_delay_ms: Option<u64>,

    /// Print the message instead of sending it
    #[arg(long = "dry-run", help_heading = "Delivery")]
    pub dry_run: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(
        long = "log-level",
        value_enum,
        default_value_t = LogLevel::Error,
        help_heading = "Debugging"
    )]
    pub log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", value_name = "FILE", help_heading = "Debugging")]
    pub log_file: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved configuration with secrets redacted
    Config,
}
