//! Main entry point for the Helmsman server.

use clap::Parser;
use tracing::error;

use helmsman_server::model::{Cli, Configuration};
use helmsman_server::{command, startup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let configuration = Configuration::new(&cli)?;
    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    match command::run(&configuration, cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "command failed");
            Err(e)
        }
    }
}
