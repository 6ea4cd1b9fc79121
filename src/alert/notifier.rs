//! Notifier channel trait shared by all alert transports.

use super::event::AlertEvent;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Per-channel delivery outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendResult {
    Sent,
    Failed(String),
}

/// One alert delivery channel (email, chat bot, ...).
///
/// A failing channel reports its error; it never blocks the other channels
/// in the fan-out.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name for logs and dispatch outcomes.
    fn name(&self) -> &str;

    async fn send(&self, event: &AlertEvent) -> Result<SendResult>;
}
