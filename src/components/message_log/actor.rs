use super::models::Message;
use crate::error::{component_error, AppResult};
use tokio::sync::mpsc;
use tracing::info;

/// The message log actor owning the conversation transcript
///
/// Every mutation of the shared log goes through this single command loop, so
/// overlapping requests and detached speech tasks can never interleave writes.
pub struct MessageLogActor {
    messages: Vec<Message>,
    command_rx: mpsc::Receiver<MessageLogCommand>,
}

/// Commands that can be sent to the message log actor
pub enum MessageLogCommand {
    Append(Message, mpsc::Sender<AppResult<()>>),
    Snapshot(mpsc::Sender<AppResult<Vec<Message>>>),
    Shutdown,
}

/// Handle for communicating with the message log actor
#[derive(Clone)]
pub struct MessageLogHandle {
    command_tx: mpsc::Sender<MessageLogCommand>,
}

impl MessageLogHandle {
    /// Create a new empty handle for initialization purposes
    pub fn empty() -> Self {
        let (command_tx, _) = mpsc::channel(32);
        Self { command_tx }
    }

    /// Append one entry to the end of the log
    pub async fn append(&self, message: Message) -> AppResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(MessageLogCommand::Append(message, response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Get a copy of the full log in insertion order
    pub async fn snapshot(&self) -> AppResult<Vec<Message>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(MessageLogCommand::Snapshot(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(MessageLogCommand::Shutdown).await;
        Ok(())
    }
}

impl MessageLogActor {
    /// Create a new actor and return its handle
    pub fn new() -> (Self, MessageLogHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            messages: Vec::new(),
            command_rx,
        };

        let handle = MessageLogHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Message log actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                MessageLogCommand::Append(message, response_tx) => {
                    self.messages.push(message);
                    let _ = response_tx.send(Ok(())).await;
                }
                MessageLogCommand::Snapshot(response_tx) => {
                    let _ = response_tx.send(Ok(self.messages.clone())).await;
                }
                MessageLogCommand::Shutdown => {
                    info!("Message log actor shutting down");
                    break;
                }
            }
        }

        info!("Message log actor shut down");
    }
}
