use super::capture;
use super::models::Transcription;
use super::transcriber::Transcriber;
use crate::config::Config;
use crate::error::{audio_error, component_error, AppResult, Error};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

/// The listener actor serializing access to the microphone
pub struct ListenerActor {
    config: Arc<RwLock<Config>>,
    transcriber: Transcriber,
    command_rx: mpsc::Receiver<ListenerCommand>,
}

/// Commands that can be sent to the listener actor
pub enum ListenerCommand {
    ListenOnce(mpsc::Sender<AppResult<Transcription>>),
    Shutdown,
}

/// Handle for communicating with the listener actor
#[derive(Clone)]
pub struct ListenerHandle {
    command_tx: mpsc::Sender<ListenerCommand>,
}

impl ListenerHandle {
    /// Run one capture-and-recognize cycle
    ///
    /// Blocks until the microphone window closes and the recognition service
    /// answers. Device failures are errors; recognition failures come back
    /// as `Transcription` variants.
    pub async fn listen_once(&self) -> AppResult<Transcription> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(ListenerCommand::ListenOnce(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(ListenerCommand::Shutdown).await;
        Ok(())
    }
}

impl ListenerActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>, transcriber: Transcriber) -> (Self, ListenerHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            config,
            transcriber,
            command_rx,
        };

        let handle = ListenerHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Listener actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                ListenerCommand::ListenOnce(response_tx) => {
                    let result = self.listen_once().await;
                    let _ = response_tx.send(result).await;
                }
                ListenerCommand::Shutdown => {
                    info!("Listener actor shutting down");
                    break;
                }
            }
        }

        info!("Listener actor shut down");
    }

    async fn listen_once(&self) -> AppResult<Transcription> {
        let (calibration, phrase_limit) = {
            let config_read = self.config.read().await;
            (
                Duration::from_secs_f32(config_read.calibration_secs),
                Duration::from_secs_f32(config_read.phrase_limit_secs),
            )
        };

        // cpal streams are not Send, keep the capture on a blocking thread
        let samples =
            tokio::task::spawn_blocking(move || capture::record(calibration, phrase_limit))
                .await
                .map_err(|e| audio_error(&format!("Capture task failed: {}", e)))??;

        if samples.is_empty() {
            return Ok(Transcription::Unrecognized);
        }

        let wav = capture::samples_to_wav(&samples, capture::SAMPLE_RATE)?;

        match self.transcriber.transcribe(wav).await {
            Ok(text) => {
                let text = text.trim().to_lowercase();
                if text.is_empty() {
                    Ok(Transcription::Unrecognized)
                } else {
                    Ok(Transcription::Text(text))
                }
            }
            // Service unavailability is an expected outcome, not a fault
            Err(Error::Recognition(message)) => Ok(Transcription::ServiceError(message)),
            Err(e) => Err(e),
        }
    }
}
