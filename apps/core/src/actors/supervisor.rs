use crate::actors::broadcast::{BroadcastDispatcher, BroadcastReport};
use crate::actors::intake::{BatchReport, IntakePipeline};
use crate::actors::messages::{ActorError, AppError, SupervisorMessage};
use crate::models::{BroadcastRequest, WebhookPayload};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument};
use validator::Validate;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);
const BROADCAST_TIMEOUT: Duration = Duration::from_secs(300);

/// A handle to the `SupervisorActor`.
///
/// This is the entry point the webhook and operator layers call. The actor
/// owns the intake pipeline and the broadcast dispatcher and works through
/// requests one at a time.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
}

impl SupervisorHandle {
    /// Spawns the supervisor on the current Tokio runtime and returns a handle to it.
    pub fn new(intake: IntakePipeline, broadcaster: BroadcastDispatcher) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = SupervisorRunner {
            receiver,
            intake,
            broadcaster,
        };
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }

    /// Runs one webhook delivery through the intake pipeline.
    ///
    /// # Returns
    ///
    /// The batch report, or `AppError::Validation` when the payload is not a
    /// page subscription event.
    #[instrument(skip(self, payload), fields(object = %payload.object))]
    pub async fn process_webhook(&self, payload: WebhookPayload) -> Result<BatchReport, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::ProcessWebhook {
            payload,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::MailboxClosed(e.to_string()))?;
        timeout(WEBHOOK_TIMEOUT, recv)
            .await?
            .map_err(|e| ActorError::ResponseDropped(e.to_string()))?
    }

    /// Validates and sends an operator broadcast.
    #[instrument(skip(self, request), fields(recipients = request.lead_ids.len()))]
    pub async fn broadcast(&self, request: BroadcastRequest) -> Result<BroadcastReport, AppError> {
        request.validate()?;

        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::Broadcast {
            request,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::MailboxClosed(e.to_string()))?;
        timeout(BROADCAST_TIMEOUT, recv)
            .await?
            .map_err(|e| ActorError::ResponseDropped(e.to_string()))?
    }

    /// Asks the supervisor loop to stop after the requests already queued.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SupervisorMessage::Shutdown)
            .await
            .map_err(|e| ActorError::MailboxClosed(e.to_string()))?;
        Ok(())
    }
}

// --- Actor Runner ---
struct SupervisorRunner {
    receiver: mpsc::Receiver<SupervisorMessage>,
    intake: IntakePipeline,
    broadcaster: BroadcastDispatcher,
}

impl SupervisorRunner {
    async fn run(mut self) {
        info!("Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if !self.handle_message(msg).await {
                break;
            }
        }
        info!("Supervisor stopped");
    }

    /// Returns `false` once the loop should stop.
    async fn handle_message(&mut self, msg: SupervisorMessage) -> bool {
        match msg {
            SupervisorMessage::ProcessWebhook { payload, responder } => {
                let result = self.handle_webhook(payload).await;
                if let Err(e) = &result {
                    error!("Error processing webhook: {}", e);
                }
                let _ = responder.send(result);
            }
            SupervisorMessage::Broadcast { request, responder } => {
                let report = self
                    .broadcaster
                    .broadcast(&request.lead_ids, &request.message)
                    .await;
                let _ = responder.send(Ok(report));
            }
            SupervisorMessage::Shutdown => {
                info!("Supervisor shutting down...");
                return false;
            }
        }
        true
    }

    async fn handle_webhook(&self, payload: WebhookPayload) -> Result<BatchReport, AppError> {
        if !payload.is_page_event() {
            return Err(AppError::Validation(format!(
                "Unsupported webhook object: {}",
                payload.object
            )));
        }
        Ok(self.intake.process_batch(&payload.entry).await)
    }
}
