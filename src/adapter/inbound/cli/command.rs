//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Alert feed and batch lookup client for the MediGuard service
#[derive(Parser, Debug)]
#[command(name = "mediguard")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the service, then follow the alert feed until Ctrl-C
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Look up a batch in local and remote data
    Lookup(LookupArgs),

    /// List high-risk batches
    Risk(LimitArgs),

    /// Show recent alerts kept by the service
    Alerts(LimitArgs),

    /// Ask the service to start a simulated alert stream
    Prime(PrimeArgs),
}

/// Subcommands for `mediguard check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Probe service reachability
    Health(ServiceArgs),
    /// Validate the configuration and show resolved endpoints
    Config(ServiceArgs),
}

/// Configuration path and base-address override shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Service base address (overrides config and MEDIGUARD_API_BASE)
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Do not start the simulated alert stream
    #[arg(long)]
    pub no_prime: bool,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Batch identifier (case and surrounding whitespace are ignored)
    pub batch: String,
}

#[derive(Args, Debug)]
pub struct LimitArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Maximum number of rows
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct PrimeArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Stream duration in seconds (default from config)
    #[arg(long)]
    pub seconds: Option<u32>,

    /// Seconds between simulated events (default from config)
    #[arg(long)]
    pub interval: Option<f64>,
}
