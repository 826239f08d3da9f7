//! Configuration loading shared by command handlers.

use crate::adapter::inbound::cli::command::ServiceArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Load the configuration file and apply `--api-base`.
///
/// # Errors
///
/// Returns an error if the file exists but is unreadable, malformed or invalid.
pub fn load_config(args: &ServiceArgs) -> Result<Config> {
    let mut config = Config::load(&args.config)?;
    config.apply_api_base(args.api_base.clone());
    config.validate()?;
    Ok(config)
}

/// Logging for one-shot commands: warnings only, more with `-v`.
pub fn init_command_logging(config: &Config) {
    let mut logging = config.logging.clone();
    logging.level = match output::verbosity() {
        0 => "warn".into(),
        1 => "info".into(),
        _ => "debug".into(),
    };
    logging.init();
}
