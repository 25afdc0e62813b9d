//! hermes-cli - uniform entry point to the Hermes store
//!
//! `hermes-cli <action> [group[/key]] [value...]` performs exactly one
//! request and prints the status code and the response body.

use anyhow::{Context, Result};
use clap::Parser;
use hermes_client::cli::{self, CliError};
use hermes_client::{StoreClient, StoreConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "hermes-cli", version, about = "Hermes key-value store client")]
struct Cli {
    /// Store base URL, overrides the config file
    #[arg(long, env = "HERMES_URL")]
    url: Option<Url>,

    /// Path of the client config file
    #[arg(long, env = "HERMES_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// <action> [group[/key]] [value...]
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = StoreConfig::load(cli.config.as_deref())
        .await
        .context("Failed to load store config")?;
    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli).await?;
    let client = StoreClient::new(&config);

    match cli::run(&client, &cli.args, &mut std::io::stdout()).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(CliError::Usage(e)) => {
            eprintln!("{e}");
            Ok(ExitCode::from(1))
        }
        Err(e) => {
            error!("Request to {} failed: {}", config.url, e);
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
