use crate::error::AppError;
use crate::models::{Contact, Interaction, NewInteraction, OutboundAttachment, Platform};
use async_trait::async_trait;
use std::sync::Arc;

pub use crate::brain::sentiment::SentimentScorer;

/// Defines the contact (lead) registry the pipeline resolves senders against.
///
/// Implementations must make `find_or_create` an atomic insert-if-absent:
/// concurrent calls with the same channel identifier yield one contact.
#[async_trait]
pub trait ContactStore: Send + Sync + 'static {
    /// Returns the contact for `channel_id`, creating it on first sight.
    async fn find_or_create(&self, channel_id: &str, platform: Platform) -> Result<Contact, AppError>;

    /// Looks up a contact without creating one.
    async fn find_by_channel_id(&self, channel_id: &str) -> Result<Option<Contact>, AppError>;
}

/// Defines the append-only interaction log.
#[async_trait]
pub trait InteractionStore: Send + Sync + 'static {
    async fn append(&self, interaction: NewInteraction) -> Result<Interaction, AppError>;
}

/// Defines the outbound channel to the messaging provider.
#[async_trait]
pub trait MessageTransport: Send + Sync + 'static {
    /// Sends a text message to a recipient.
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<(), AppError>;

    /// Sends an attachment (by URL) to a recipient.
    async fn send_attachment(
        &self,
        recipient_id: &str,
        attachment: &OutboundAttachment,
    ) -> Result<(), AppError>;
}

/// The external collaborators shared by the intake pipeline and the broadcast dispatcher.
#[derive(Clone)]
pub struct Collaborators {
    pub contacts: Arc<dyn ContactStore>,
    pub interactions: Arc<dyn InteractionStore>,
    pub transport: Arc<dyn MessageTransport>,
    pub sentiment: Arc<dyn SentimentScorer>,
}
