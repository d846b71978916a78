use std::sync::Arc;

use secrets_demo::{
    api::{start_api_server, ApiState},
    config::{load_dotenv, AppConfig},
    observability::{init_logging, log_config_info},
    secrets::{bootstrap_from_settings, BootstrapOptions, SecretsStore},
    APP_NAME, VERSION,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Must happen before any config is read from the environment
    load_dotenv();

    let config = AppConfig::from_env()?;
    init_logging(&config.logging)?;

    info!(app_name = APP_NAME, version = VERSION, "Starting secrets demo server");
    log_config_info(&config);

    // The HTTP listener is not opened until secrets are validated and published
    let (provider, published) = match bootstrap_from_settings(
        &config.secrets,
        SecretsStore::global(),
        BootstrapOptions { mirror_env: true },
    )
    .await
    {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %e, "Failed to start server");
            return Err(e.into());
        }
    };

    let state = ApiState::new(published.clone(), Arc::new(provider), config.environment)
        .with_rate_limit(config.server.rate_limit.clone());

    if let Err(e) = start_api_server(&config.server, state).await {
        error!(error = %e, "API server terminated with error");
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}
