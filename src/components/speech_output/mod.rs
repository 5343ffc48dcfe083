mod engine;
mod handle;

pub use engine::{HttpTtsEngine, NullEngine, SpeechEngine};
pub use handle::SpeakerHandle;

use crate::components::message_log::MessageLogHandle;
use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Speech output component wrapping the synthesis engine
#[derive(Default)]
pub struct SpeechOutput {
    handle: RwLock<Option<SpeakerHandle>>,
}

impl SpeechOutput {
    /// Create a new speech output component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<SpeakerHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for SpeechOutput {
    fn name(&self) -> &'static str {
        "speech_output"
    }

    async fn init(
        &self,
        config: Arc<RwLock<Config>>,
        log_handle: MessageLogHandle,
    ) -> AppResult<()> {
        let engine: Arc<dyn SpeechEngine> = {
            let config_read = config.read().await;
            if config_read.tts_enabled {
                Arc::new(HttpTtsEngine::new(
                    config_read.speech_api_base.clone(),
                    config_read.speech_api_key.clone(),
                    config_read.tts_voice.clone(),
                    config_read.tts_speed,
                ))
            } else {
                Arc::new(NullEngine)
            }
        };

        let mut handle_lock = self.handle.write().await;
        *handle_lock = Some(SpeakerHandle::new(log_handle, engine));

        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        // In-flight playback tasks are detached by design; nothing to stop
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
