use pr_relay::core::config::AppConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();
    pr_relay::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        e
    })?;
    info!(port = config.port, "Starting pr-relay");

    pr_relay::server::run(config).await?;
    Ok(())
}
