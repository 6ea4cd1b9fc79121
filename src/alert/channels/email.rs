//! SMTP alert channel.

use crate::alert::event::AlertEvent;
use crate::alert::notifier::{Notifier, SendResult};
use crate::config::EmailConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

/// Sends plain-text alert emails over SMTP (STARTTLS).
pub struct EmailNotifier {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Result<Self> {
        anyhow::ensure!(!config.smtp_host.is_empty(), "smtp_host is required");
        anyhow::ensure!(!config.to_address.is_empty(), "to_address is required");

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .context("Failed to create SMTP transport")?
            .port(config.smtp_port);

        if let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, event: &AlertEvent) -> Result<SendResult> {
        let subject = format!("[Wildfire Sentinel] Fire detected in {}", event.result.zone);

        let email = Message::builder()
            .from(self.config.from_address.parse().context("bad from address")?)
            .to(self.config.to_address.parse().context("bad to address")?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(event.body())
            .context("Failed to build alert email")?;

        self.transport
            .send(email)
            .await
            .context("SMTP send failed")?;

        debug!(to = %self.config.to_address, zone = %event.result.zone, "Alert email sent");
        Ok(SendResult::Sent)
    }
}
