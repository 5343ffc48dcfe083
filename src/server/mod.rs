pub mod handlers;

use crate::components::google_calendar::GoogleCalendarHandle;
use crate::components::message_log::MessageLogHandle;
use crate::components::speech_input::ListenerHandle;
use crate::components::speech_output::SpeakerHandle;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Shared state for the request handlers
#[derive(Clone)]
pub struct AppState {
    pub log_handle: MessageLogHandle,
    pub speaker: SpeakerHandle,
    pub listener: ListenerHandle,
    pub calendar: GoogleCalendarHandle,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/listen", get(handlers::listen_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
