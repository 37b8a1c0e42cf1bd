//! ccl: serialized updates of cloud config documents.
//!
//! This is the main entry point for the `ccl` CLI. It parses arguments,
//! loads configuration, installs logging, dispatches to the appropriate
//! command handler, and maps errors to exit codes.

use cloud_config_lock::cli::Cli;
use cloud_config_lock::config::Config;
use cloud_config_lock::error::Result;
use cloud_config_lock::{commands, exit_codes, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    logging::init_logging(&config.logging)?;
    commands::dispatch(cli.command, &config).await
}
