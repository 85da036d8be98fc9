use serde::Serialize;
use tokio::sync::oneshot;

use crate::actors::broadcast::BroadcastReport;
use crate::actors::intake::BatchReport;
use crate::models::{BroadcastRequest, WebhookPayload};

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// The actor's mailbox is closed; the runner has stopped.
    #[error("Actor mailbox closed: {0}")]
    MailboxClosed(String),
    /// The actor dropped the responder without answering.
    #[error("Actor dropped the response: {0}")]
    ResponseDropped(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// One webhook delivery to run through the intake pipeline.
    ProcessWebhook {
        payload: WebhookPayload,
        /// A channel to send the batch report back.
        responder: oneshot::Sender<Result<BatchReport, AppError>>,
    },
    /// An operator broadcast.
    Broadcast {
        request: BroadcastRequest,
        /// A channel to send the broadcast report back.
        responder: oneshot::Sender<Result<BroadcastReport, AppError>>,
    },
    /// A command to stop the supervisor loop.
    Shutdown,
}
