mod actor;
pub mod capture;
pub mod models;
mod transcriber;

pub use actor::{ListenerActor, ListenerHandle};
pub use models::Transcription;
pub use transcriber::Transcriber;

use crate::components::message_log::MessageLogHandle;
use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Speech input component wrapping microphone capture and recognition
#[derive(Default)]
pub struct SpeechInput {
    handle: RwLock<Option<ListenerHandle>>,
}

impl SpeechInput {
    /// Create a new speech input component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<ListenerHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for SpeechInput {
    fn name(&self) -> &'static str {
        "speech_input"
    }

    async fn init(
        &self,
        config: Arc<RwLock<Config>>,
        _log_handle: MessageLogHandle,
    ) -> AppResult<()> {
        let transcriber = {
            let config_read = config.read().await;
            Transcriber::new(
                config_read.speech_api_base.clone(),
                config_read.speech_api_key.clone(),
                config_read.stt_model.clone(),
            )
        };

        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            let (mut actor, handle) = ListenerActor::new(Arc::clone(&config), transcriber);

            tokio::spawn(async move {
                actor.run().await;
            });

            *handle_lock = Some(handle);
        }

        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
