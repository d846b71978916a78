//! # Command Line Interface
//!
//! Development tooling that seeds a local Vault or LocalStack backend with
//! the sample secret set the service expects.

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::{load_dotenv, AppConfig};
use crate::observability::init_logging;
use crate::setup::{setup_localstack, setup_vault, RetryPolicy};

#[derive(Parser, Debug)]
#[command(name = "secrets-setup")]
#[command(about = "Seed local secret backends with development secrets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// How many times to check the backend before giving up
    #[arg(long, global = true, default_value_t = 10)]
    pub max_retries: u32,

    /// Delay between readiness checks, in milliseconds
    #[arg(long, global = true, default_value_t = 2000)]
    pub retry_delay_ms: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Enable the KV v2 engine and write secrets to VAULT_SECRET_PATH
    Vault,

    /// Recreate SECRET_NAME in the LocalStack Secrets Manager emulator
    Localstack,
}

impl Cli {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries.max(1),
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    load_dotenv();
    let mut config = AppConfig::from_env()?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging)?;

    let policy = cli.retry_policy();
    match cli.command {
        Commands::Vault => setup_vault(&config.secrets.vault, &policy).await?,
        Commands::Localstack => setup_localstack(&config.secrets, &policy).await?,
    }

    Ok(())
}
