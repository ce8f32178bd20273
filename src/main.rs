use appointments_api::config::ApiConfig;
use appointments_db::create_repository;
use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ApiConfig::from_env()?;
    appointments_api::init_tracing(&config)?;
    info!("Loaded configuration for {:?} environment", config.environment);

    let repository = create_repository(config.storage_type, config.database_url.as_deref()).await?;

    appointments_api::start_server(config, repository).await?;

    Ok(())
}
