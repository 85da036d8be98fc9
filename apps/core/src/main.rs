// LeadReply Entry Point
// Command-line front end over the supervisor: webhook replay, broadcasts, history.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use leadreply_core::config::AppConfig;
use leadreply_core::database::{self, SqliteStore};
use leadreply_core::models::{BroadcastRequest, WebhookPayload};
use leadreply_core::{start_supervisor, telemetry};
use serde_json::json;
use tokio::io::AsyncReadExt;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "leadreply", version, about = "Classify, log and answer inbound chat messages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Process one webhook delivery (JSON file, or `-` for stdin).
    Webhook { input: PathBuf },
    /// Send a message to a list of contacts.
    Broadcast {
        #[arg(short, long)]
        message: String,
        /// Channel identifiers of the recipients.
        #[arg(required = true)]
        lead_ids: Vec<String>,
    },
    /// Print a contact's interaction log.
    History { channel_id: String },
}

async fn read_input(input: &PathBuf) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        Ok(buf)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing("leadreply");

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let pool = database::init_db(&config.database_url).await?;

    match cli.command {
        Command::Webhook { input } => {
            let raw = read_input(&input).await?;
            let payload: WebhookPayload =
                serde_json::from_str(&raw).context("Webhook payload is not valid JSON")?;
            let supervisor = start_supervisor(&config, SqliteStore::new(pool)).await?;
            let report = supervisor.process_webhook(payload).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            supervisor.shutdown().await?;
            if !report.is_success() {
                bail!("{} event(s) failed", report.failed);
            }
        }
        Command::Broadcast { message, lead_ids } => {
            let supervisor = start_supervisor(&config, SqliteStore::new(pool)).await?;
            let report = supervisor
                .broadcast(BroadcastRequest { lead_ids, message })
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            supervisor.shutdown().await?;
        }
        Command::History { channel_id } => {
            let Some(contact) = database::get_contact_by_channel_id(&pool, &channel_id).await? else {
                bail!("No contact with channel id {}", channel_id);
            };
            let interactions = database::list_interactions_for_contact(&pool, &contact.id).await?;
            info!(%channel_id, count = interactions.len(), "Loaded interaction history");
            let out = json!({ "contact": contact, "interactions": interactions });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
