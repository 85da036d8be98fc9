use crate::actors::traits::{ContactStore, InteractionStore};
use crate::error::AppError;
use crate::models::{Contact, Interaction, NewInteraction, Platform};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

pub async fn init_db(database_url: &str) -> Result<SqlitePool, AppError> {
    info!("Initializing database at: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = options.get_filename().to_string_lossy().contains(":memory:")
        || database_url.contains(":memory:");

    let pool_options = if in_memory {
        // Every connection to an in-memory database is its own database.
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

// --- Contacts ---

/// Atomic insert-if-absent on the unique `channel_id`, then read back.
pub async fn find_or_create_contact(
    pool: &SqlitePool,
    channel_id: &str,
    platform: Platform,
) -> Result<Contact, AppError> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().timestamp();

    let inserted = sqlx::query(
        r#"
        INSERT INTO contacts (id, channel_id, platform, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(channel_id) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(channel_id)
    .bind(platform)
    .bind(created_at)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        debug!(channel_id, %platform, "Created contact");
    }

    get_contact_by_channel_id(pool, channel_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Contact {} vanished after upsert", channel_id)))
}

pub async fn get_contact_by_channel_id(
    pool: &SqlitePool,
    channel_id: &str,
) -> Result<Option<Contact>, AppError> {
    let contact = sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, channel_id, platform, email, created_at
        FROM contacts
        WHERE channel_id = ?
        "#,
    )
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;
    Ok(contact)
}

pub async fn list_contacts(pool: &SqlitePool) -> Result<Vec<Contact>, AppError> {
    let contacts = sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, channel_id, platform, email, created_at
        FROM contacts
        ORDER BY created_at ASC, channel_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(contacts)
}

// --- Interactions ---

pub async fn append_interaction(
    pool: &SqlitePool,
    interaction: NewInteraction,
) -> Result<Interaction, AppError> {
    let created_at = Utc::now().timestamp();

    let stored = sqlx::query_as::<_, Interaction>(
        r#"
        INSERT INTO interactions
            (contact_id, message, intent, sentiment_score, sentiment_comparative, metadata, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, contact_id, message, intent, sentiment_score, sentiment_comparative, metadata, created_at
        "#,
    )
    .bind(&interaction.contact_id)
    .bind(&interaction.message)
    .bind(&interaction.intent)
    .bind(interaction.sentiment_score)
    .bind(interaction.sentiment_comparative)
    .bind(Json(interaction.metadata))
    .bind(created_at)
    .fetch_one(pool)
    .await?;
    Ok(stored)
}

/// A contact's interactions in arrival order.
pub async fn list_interactions_for_contact(
    pool: &SqlitePool,
    contact_id: &str,
) -> Result<Vec<Interaction>, AppError> {
    let interactions = sqlx::query_as::<_, Interaction>(
        r#"
        SELECT id, contact_id, message, intent, sentiment_score, sentiment_comparative, metadata, created_at
        FROM interactions
        WHERE contact_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(contact_id)
    .fetch_all(pool)
    .await?;
    Ok(interactions)
}

/// Both pipeline stores backed by one SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for SqliteStore {
    async fn find_or_create(&self, channel_id: &str, platform: Platform) -> Result<Contact, AppError> {
        find_or_create_contact(&self.pool, channel_id, platform).await
    }

    async fn find_by_channel_id(&self, channel_id: &str) -> Result<Option<Contact>, AppError> {
        get_contact_by_channel_id(&self.pool, channel_id).await
    }
}

#[async_trait]
impl InteractionStore for SqliteStore {
    async fn append(&self, interaction: NewInteraction) -> Result<Interaction, AppError> {
        append_interaction(&self.pool, interaction).await
    }
}
