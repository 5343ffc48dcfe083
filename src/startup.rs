use crate::components::{
    google_calendar::GoogleCalendar, message_log::MessageLogActor, speech_input::SpeechInput,
    speech_output::SpeechOutput, ComponentManager,
};
use crate::config::Config;
use crate::error::{component_error, Error};
use crate::server::{self, AppState};
use crate::shutdown;
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Initialize the components and start the web server
pub async fn start_server(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    // The message log actor comes up first; every component writes the
    // shared transcript through its handle
    let (mut log_actor, log_handle) = MessageLogActor::new();
    tokio::spawn(async move {
        log_actor.run().await;
    });

    // Register and initialize components
    let mut component_manager = ComponentManager::new(Arc::clone(&config));
    component_manager.register(SpeechOutput::new());
    component_manager.register(SpeechInput::new());
    component_manager.register(GoogleCalendar::new());
    let component_manager = Arc::new(component_manager);

    component_manager
        .init_all(Arc::clone(&config), log_handle.clone())
        .await?;

    // Collect the handles the request handlers need
    let speaker = {
        let component = component_manager
            .get_component_by_name("speech_output")
            .and_then(|c| c.as_any().downcast_ref::<SpeechOutput>())
            .ok_or_else(|| component_error("speech_output component missing"))?;
        component
            .get_handle()
            .await
            .ok_or_else(|| component_error("speech_output component not initialized"))?
    };

    let listener = {
        let component = component_manager
            .get_component_by_name("speech_input")
            .and_then(|c| c.as_any().downcast_ref::<SpeechInput>())
            .ok_or_else(|| component_error("speech_input component missing"))?;
        component
            .get_handle()
            .await
            .ok_or_else(|| component_error("speech_input component not initialized"))?
    };

    let calendar = {
        let component = component_manager
            .get_component_by_name("google_calendar")
            .and_then(|c| c.as_any().downcast_ref::<GoogleCalendar>())
            .ok_or_else(|| component_error("google_calendar component missing"))?;
        component
            .get_handle()
            .await
            .ok_or_else(|| component_error("google_calendar component not initialized"))?
    };

    let state = AppState {
        log_handle: log_handle.clone(),
        speaker,
        listener,
        calendar,
    };

    // Create shutdown channel and spawn the signal handler task
    let (shutdown_send, shutdown_recv) = oneshot::channel();
    let shutdown_components = Arc::clone(&component_manager);
    let shutdown_log = log_handle.clone();

    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components, shutdown_log).await;
    });

    let bind_addr = {
        let config_read = config.read().await;
        config_read.bind_addr.clone()
    };

    let app = server::router(state);
    let tcp_listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(Error::from)?;

    info!("Alfred listening on http://{}", bind_addr);

    axum::serve(tcp_listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_recv.await;
        })
        .await
        .map_err(Error::from)?;

    info!("Server stopped");
    Ok(())
}
