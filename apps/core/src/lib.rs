// LeadReply Core
// Classifies inbound chat messages, logs them per contact and answers them.

pub mod actors;
pub mod brain;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod telemetry;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use tracing::info;

use actors::{BroadcastDispatcher, Collaborators, GraphApiTransport, IntakePipeline, SupervisorHandle};
use brain::{IntentClassifier, IntentTable, LexiconSentiment, ResponseGenerator};
use config::AppConfig;
use database::SqliteStore;
use error::AppError;

/// Loads the configured intent table, or the built-in one.
pub fn load_intent_table(config: &AppConfig) -> Result<IntentTable, AppError> {
    match &config.intents_file {
        Some(path) => IntentTable::load(path),
        None => Ok(IntentTable::default()),
    }
}

/// Loads the configured AFINN word list, or the bundled AFINN-165 table.
pub fn load_sentiment(config: &AppConfig) -> Result<LexiconSentiment, AppError> {
    match &config.sentiment_lexicon {
        Some(path) => LexiconSentiment::from_afinn_file(path),
        None => Ok(LexiconSentiment::new()),
    }
}

/// Wires the SQLite store, Send API transport and lexicon sentiment scorer
/// into a running supervisor.
pub async fn start_supervisor(
    config: &AppConfig,
    store: SqliteStore,
) -> Result<SupervisorHandle, AppError> {
    let table = Arc::new(load_intent_table(config)?);
    let store = Arc::new(store);
    let collaborators = Collaborators {
        contacts: store.clone(),
        interactions: store,
        transport: Arc::new(GraphApiTransport::from_config(config)?),
        sentiment: Arc::new(load_sentiment(config)?),
    };

    info!(intents = table.len(), platform = %config.platform, "Starting supervisor");

    let intake = IntakePipeline::new(
        IntentClassifier::new(table),
        Arc::new(ResponseGenerator::default()),
        collaborators.clone(),
        config.platform,
    );
    Ok(SupervisorHandle::new(intake, BroadcastDispatcher::new(collaborators)))
}
