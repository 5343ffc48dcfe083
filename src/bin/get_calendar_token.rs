use alfred::components::google_calendar::token::TokenManager;
use alfred::config::Config;
use alfred::error::AppResult;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Run the Google Calendar consent flow ahead of time so the assistant
/// finds a ready token cache on its first calendar request.
#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load()?;
    let config = Arc::new(RwLock::new(config));

    let token_manager = TokenManager::new(Arc::clone(&config));

    // Open browser for authorization and wait for the callback
    println!("Opening browser for Google Calendar authorization...");
    token_manager.run_consent_flow().await?;

    println!(
        "Token successfully saved to {}",
        token_manager.token_path().await.display()
    );

    Ok(())
}
