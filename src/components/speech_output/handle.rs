use super::engine::SpeechEngine;
use crate::components::message_log::{Message, MessageLogHandle};
use std::sync::Arc;
use tracing::{error, info};

/// Handle for speaking assistant replies
///
/// `speak` records the reply in the message log before returning; the audible
/// playback runs as a detached task and is not synchronized with the caller
/// or the response lifecycle.
#[derive(Clone)]
pub struct SpeakerHandle {
    log_handle: MessageLogHandle,
    engine: Arc<dyn SpeechEngine>,
}

impl SpeakerHandle {
    pub fn new(log_handle: MessageLogHandle, engine: Arc<dyn SpeechEngine>) -> Self {
        Self { log_handle, engine }
    }

    /// Log the text as an assistant message and play it in the background
    ///
    /// Synthesis and playback failures are reported to the tracing sink only;
    /// they never reach the message log or the caller.
    pub async fn speak(&self, text: &str) {
        info!(reply = %text, "Alfred");

        if let Err(e) = self.log_handle.append(Message::bot(text)).await {
            error!("Failed to record spoken message: {:?}", e);
        }

        let engine = Arc::clone(&self.engine);
        let text = text.to_string();
        tokio::spawn(async move {
            if let Err(e) = engine.speak(&text).await {
                error!("Speech synthesis failed: {:?}", e);
            }
        });
    }
}
