// src/services/telegram.rs

//! Telegram delivery channel.
//!
//! Sends verdict messages to the single configured chat via the Bot API.
//! Delivery failures are logged and absorbed here; a lost notification must
//! never take the poll loop down with it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::TelegramConfig;
use crate::services::MessageSink;
use crate::utils::http;

/// Telegram Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Receipt for a delivered message.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
    #[serde(default)]
    pub date: Option<i64>,
}

/// Delivers text messages to one fixed chat.
pub struct Notifier {
    config: TelegramConfig,
    token: String,
    chat_id: String,
    client: Client,
}

impl Notifier {
    /// Create a notifier bound to a single chat.
    pub fn new(config: TelegramConfig, token: String, chat_id: String) -> Result<Self> {
        let client = http::create_client("reviewbell/0.1", config.timeout_secs)?;
        Ok(Self {
            config,
            token,
            chat_id,
            client,
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.token,
            method
        )
    }

    /// Attempt a delivery, classifying failures by layer.
    async fn try_send(&self, text: &str) -> Result<SentMessage> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(AppError::MessagingTransport)?;

        let envelope: ApiResponse<SentMessage> = response.json().await.map_err(|e| {
            AppError::messaging_api(format!("undecodable sendMessage response: {e}"))
        })?;

        if !envelope.ok {
            return Err(AppError::messaging_api(
                envelope
                    .description
                    .unwrap_or_else(|| "sendMessage rejected".into()),
            ));
        }

        envelope
            .result
            .ok_or_else(|| AppError::messaging_api("sendMessage returned no message"))
    }
}

#[async_trait]
impl MessageSink for Notifier {
    async fn send(&self, text: &str) -> Option<SentMessage> {
        match self.try_send(text).await {
            Ok(sent) => Some(sent),
            Err(error) => {
                tracing::error!("message not delivered ({error}): {text:?}");
                None
            }
        }
    }
}
