use crate::strategy::BatchConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Convert bank CSV exports into beancount entries
#[derive(Parser, Debug)]
#[command(name = "csv2beancount")]
#[command(about = "Convert bank CSV exports into beancount entries", long_about = None)]
pub struct CliArgs {
    /// Configuration file
    #[arg(
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Config file (default: ./config.toml when present)"
    )]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short = 'v', long = "verbose", global = true, help = "Verbose output")]
    pub verbose: bool,

    /// Trace-level logging
    #[arg(short = 'd', long = "debug", global = true, help = "Debug output")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a CSV export and write the entries to stdout
    Convert(ConvertArgs),
    /// Print version information
    Version,
}

/// Arguments of the `convert` subcommand
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input CSV file path
    #[arg(value_name = "CSV FILE", help = "Path to the bank's CSV export")]
    pub input_file: PathBuf,

    /// Output template
    #[arg(
        long = "template",
        value_name = "FILE",
        help = "Template file for each entry (default: built-in beancount template)"
    )]
    pub template: Option<PathBuf>,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for streaming or 'async' for batched parallel classification"
    )]
    pub strategy: StrategyType,

    /// Number of rows per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of rows per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of classification workers (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Maximum log level selected by the flags: `-d` beats `-v`
    pub fn log_level(&self) -> tracing::Level {
        if self.debug {
            tracing::Level::TRACE
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}

impl ConvertArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Values not given on the command line take their defaults. Invalid values
    /// are replaced by the default with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }
}
