use alfred::components::message_log::{Message, MessageLogActor, MessageLogHandle};
use alfred::components::{
    google_calendar::GoogleCalendar, speech_input::SpeechInput, speech_output::SpeechOutput,
    ComponentManager,
};
use alfred::config::Config;
use std::sync::Arc;
use tokio::sync::RwLock;

fn test_config() -> Config {
    Config {
        tts_enabled: false,
        ..Default::default()
    }
}

/// Smoke test to verify the default configuration shape
#[tokio::test]
async fn test_config_defaults() {
    let config = test_config();

    assert_eq!(config.google_calendar_id, "primary");
    assert_eq!(config.google_token_path.to_str(), Some("token.json"));
    assert!(config.google_client_id.is_empty());
    assert!(!config.tts_enabled);
}

/// Smoke test for the message log handle
#[tokio::test]
async fn test_message_log_handle_creation() {
    // Create an empty handle; mainly verifies that the handle API compiles
    // and shutdown on a disconnected handle is not an error
    let log_handle = MessageLogHandle::empty();

    assert!(log_handle.shutdown().await.is_ok());
}

/// The log preserves insertion order and never drops entries
#[tokio::test]
async fn test_message_log_append_order() {
    let (mut actor, handle) = MessageLogActor::new();
    tokio::spawn(async move {
        actor.run().await;
    });

    handle.append(Message::user("calendar")).await.unwrap();
    handle.append(Message::bot("Here are your events:")).await.unwrap();
    handle.append(Message::bot("Standup")).await.unwrap();

    let first = handle.snapshot().await.unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(first[0], Message::user("calendar"));
    assert_eq!(first[1], Message::bot("Here are your events:"));
    assert_eq!(first[2], Message::bot("Standup"));

    // Later appends never remove or reorder earlier entries
    handle.append(Message::bot("Review")).await.unwrap();
    let second = handle.snapshot().await.unwrap();
    assert_eq!(second.len(), 4);
    assert_eq!(&second[..3], &first[..]);
    assert_eq!(second[3], Message::bot("Review"));

    handle.shutdown().await.unwrap();
}

/// Components register, initialize, expose their handles, and shut down
#[tokio::test]
async fn test_component_lifecycle() {
    let config = Arc::new(RwLock::new(test_config()));

    let (mut log_actor, log_handle) = MessageLogActor::new();
    tokio::spawn(async move {
        log_actor.run().await;
    });

    let mut component_manager = ComponentManager::new(Arc::clone(&config));
    component_manager.register(SpeechOutput::new());
    component_manager.register(SpeechInput::new());
    component_manager.register(GoogleCalendar::new());

    component_manager
        .init_all(Arc::clone(&config), log_handle.clone())
        .await
        .unwrap();

    let speech_output = component_manager
        .get_component_by_name("speech_output")
        .and_then(|c| c.as_any().downcast_ref::<SpeechOutput>())
        .expect("speech_output component registered");
    assert!(speech_output.get_handle().await.is_some());

    let speech_input = component_manager
        .get_component_by_name("speech_input")
        .and_then(|c| c.as_any().downcast_ref::<SpeechInput>())
        .expect("speech_input component registered");
    assert!(speech_input.get_handle().await.is_some());

    let calendar = component_manager
        .get_component_by_name("google_calendar")
        .and_then(|c| c.as_any().downcast_ref::<GoogleCalendar>())
        .expect("google_calendar component registered");
    assert!(calendar.get_handle().await.is_some());

    assert!(component_manager.get_component_by_name("unknown").is_none());

    component_manager.shutdown_all().await.unwrap();
    log_handle.shutdown().await.unwrap();
}
