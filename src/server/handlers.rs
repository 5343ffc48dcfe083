use super::AppState;
use crate::components::message_log::{Message, MessageLogHandle};
use crate::components::speech_input::Transcription;
use crate::dispatcher::{self, FALLBACK_REPLY};
use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html};
use tracing::{error, info};

/// Template for the message log page
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    messages: Vec<Message>,
}

type HandlerResult = Result<Html<String>, (StatusCode, String)>;

/// Handler for the index page: render the log, no side effects
pub async fn index_handler(State(state): State<AppState>) -> HandlerResult {
    render_log(&state.log_handle).await
}

/// Handler for one full voice cycle: listen, dispatch, respond, render
///
/// Blocks the request for the duration of microphone capture and any
/// network calls; expected failures degrade to spoken log entries.
pub async fn listen_handler(State(state): State<AppState>) -> HandlerResult {
    let transcription = state.listener.listen_once().await.map_err(|e| {
        error!("Listen cycle failed: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", e))
    })?;

    // The user's utterance (or its sentinel rendering) lands in the log
    // before any reply is produced
    let heard = transcription.display_text();
    info!(command = %heard, "heard");
    state
        .log_handle
        .append(Message::user(heard.as_str()))
        .await
        .map_err(internal_error)?;

    match &transcription {
        Transcription::Text(command) => {
            dispatcher::dispatch(command, &state.speaker, &state.calendar).await;
        }
        // Nothing intelligible to match against, reply with the fallback
        Transcription::Unrecognized | Transcription::ServiceError(_) => {
            state.speaker.speak(FALLBACK_REPLY).await;
        }
    }

    render_log(&state.log_handle).await
}

async fn render_log(log_handle: &MessageLogHandle) -> HandlerResult {
    let messages = log_handle.snapshot().await.map_err(internal_error)?;

    let page = IndexTemplate { messages };
    let html = page.render().map_err(|e| {
        error!("Template rendering failed: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", e))
    })?;

    Ok(Html(html))
}

fn internal_error(e: crate::error::Error) -> (StatusCode, String) {
    error!("Request failed: {:?}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", e))
}
