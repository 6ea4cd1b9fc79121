//! Telegram Bot API alert channel.

use crate::alert::event::AlertEvent;
use crate::alert::notifier::{Notifier, SendResult};
use crate::config::TelegramConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends alerts through the Telegram Bot API, attaching the detection tile
/// as a photo when one is available.
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        anyhow::ensure!(!config.bot_token.is_empty(), "bot_token is required");
        anyhow::ensure!(!config.chat_id.is_empty(), "chat_id is required");

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "https://api.telegram.org/bot{}/{}",
            self.config.bot_token, method
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, event: &AlertEvent) -> Result<SendResult> {
        let text = event.body();

        // Photo message when the tile is available, plain text otherwise
        let response = match &event.result.image {
            Some(image) => {
                let photo = Part::bytes(image.clone())
                    .file_name("alert_image.png")
                    .mime_str("image/png")
                    .context("Failed to build photo part")?;
                let form = Form::new()
                    .text("chat_id", self.config.chat_id.clone())
                    .text("caption", text)
                    .part("photo", photo);

                self.client
                    .post(self.api_url("sendPhoto"))
                    .multipart(form)
                    .send()
                    .await
            }
            None => {
                self.client
                    .post(self.api_url("sendMessage"))
                    .json(&serde_json::json!({
                        "chat_id": self.config.chat_id,
                        "text": text,
                    }))
                    .send()
                    .await
            }
        }
        .context("Telegram request failed")?;

        let body: BotApiResponse = response
            .json()
            .await
            .context("Failed to parse Telegram response")?;

        if body.ok {
            debug!(chat_id = %self.config.chat_id, "Telegram alert sent");
            Ok(SendResult::Sent)
        } else {
            Ok(SendResult::Failed(
                body.description
                    .unwrap_or_else(|| "unknown Bot API error".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(bot_token: &str, chat_id: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
            timeout_secs: 15,
        }
    }

    #[test]
    fn test_requires_credentials() {
        assert!(TelegramNotifier::new(config("", "42")).is_err());
        assert!(TelegramNotifier::new(config("123:abc", "")).is_err());
        assert!(TelegramNotifier::new(config("123:abc", "42")).is_ok());
    }

    #[test]
    fn test_channel_name() {
        let notifier = TelegramNotifier::new(config("123:abc", "42")).unwrap();
        assert_eq!(notifier.name(), "telegram");
    }
}
