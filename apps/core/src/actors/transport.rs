use crate::actors::traits::MessageTransport;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::OutboundAttachment;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// Delivers messages through the Messenger Send API (`/me/messages`).
#[derive(Clone)]
pub struct GraphApiTransport {
    client: Client,
    endpoint: Url,
    access_token: String,
}

impl GraphApiTransport {
    /// # Arguments
    ///
    /// * `base_url` - Graph API origin, e.g. `https://graph.facebook.com`.
    /// * `api_version` - Versioned path segment, e.g. `v18.0`.
    /// * `access_token` - Page access token sent as a query parameter.
    /// * `timeout` - Per-request timeout.
    pub fn new(
        base_url: &str,
        api_version: &str,
        access_token: String,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let endpoint = Url::parse(base_url)?.join(&format!("{}/me/messages", api_version))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            access_token,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let access_token = config
            .access_token
            .clone()
            .ok_or_else(|| AppError::Config("FB_ACCESS_TOKEN is not set".to_string()))?;
        Self::new(
            &config.graph_api_base,
            &config.api_version,
            access_token,
            config.send_timeout,
        )
    }

    async fn post(&self, recipient_id: &str, payload: Value) -> Result<(), AppError> {
        let res = self
            .client
            .post(self.endpoint.clone())
            .query(&[("access_token", self.access_token.as_str())])
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(recipient = recipient_id, %status, "Send API rejected message");
            return Err(AppError::Delivery(format!(
                "Send request failed with status {}: {}",
                status, body
            )));
        }

        debug!(recipient = recipient_id, "Message delivered");
        Ok(())
    }
}

#[async_trait]
impl MessageTransport for GraphApiTransport {
    #[instrument(skip(self, text))]
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<(), AppError> {
        let payload = json!({
            "recipient": { "id": recipient_id },
            "message": { "text": text }
        });
        self.post(recipient_id, payload).await
    }

    #[instrument(skip(self, attachment))]
    async fn send_attachment(
        &self,
        recipient_id: &str,
        attachment: &OutboundAttachment,
    ) -> Result<(), AppError> {
        let payload = json!({
            "recipient": { "id": recipient_id },
            "message": {
                "attachment": {
                    "type": attachment.kind,
                    "payload": {
                        "url": attachment.url,
                        "is_reusable": true
                    }
                }
            }
        });
        self.post(recipient_id, payload).await
    }
}
