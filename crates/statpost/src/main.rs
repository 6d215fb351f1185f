//! statpost CLI binary.
//!
//! - `run` executes one pipeline run and fails loudly
//! - `invoke` executes one run and prints a status document for schedulers
//! - `state` shows what is stored

use clap::Parser;
use statpost::{Credentials, LoggingConfig, StatpostConfig};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, invoke_once, run_once, show_state};

    // A missing .env file is fine; variables may come from the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let logging = LoggingConfig::new(cli.verbose).with_json_logs(cli.json_logs);
    #[cfg(feature = "observability")]
    let _guard = statpost::init_observability(&logging)?;
    #[cfg(not(feature = "observability"))]
    statpost::init_logging(&logging)?;

    let credentials = Credentials::from_env();
    tracing::debug!(?credentials, "Loaded credentials");

    let config = StatpostConfig::load(cli.config.as_deref());

    match cli.command {
        Commands::Run { no_publish } => {
            run_once(config?, &credentials, no_publish).await?;
        }

        Commands::Invoke => {
            invoke_once(config, &credentials).await;
        }

        Commands::State { format, recent } => {
            show_state(&config?, format, recent).await?;
        }
    }

    Ok(())
}
