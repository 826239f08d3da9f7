//! Command-line interface: argument definitions, output and handlers.

pub mod alerts;
pub mod check;
pub mod command;
pub mod config;
pub mod console;
pub mod lookup;
pub mod output;
pub mod prime;
pub mod risk;
pub mod run;

use command::{CheckCommand, Cli, ColorChoice, Commands};

use crate::error::Result;

/// Apply the global flags to terminal output.
pub fn configure(cli: &Cli) {
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(output::OutputConfig::new(cli.json, cli.quiet, cli.verbose));
}

/// Run the selected command.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Check(CheckCommand::Health(args)) => check::execute_health(&args).await,
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args),
        Commands::Lookup(args) => lookup::execute(&args).await,
        Commands::Risk(args) => risk::execute(&args).await,
        Commands::Alerts(args) => alerts::execute(&args).await,
        Commands::Prime(args) => prime::execute(&args).await,
    }
}
