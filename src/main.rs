use anyhow::Result;
use safebreathe::{DashboardConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = DashboardConfig::load()?;
    logging::init(&config.logging)?;

    tracing::info!(
        version = safebreathe::VERSION,
        default_location = %config.default_location.name,
        "Starting SafeBreathe dashboard"
    );

    web::run(config).await
}
