use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    alfred::startup::init_logging()?;

    info!("Starting Alfred");

    // Load configuration
    let config = alfred::startup::load_config().await?;

    // Start the web server
    alfred::startup::start_server(config).await
}
