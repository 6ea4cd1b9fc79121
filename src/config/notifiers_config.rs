//! Alert channel settings (email, Telegram) with environment fallbacks.

use serde::Deserialize;

fn default_smtp_port() -> u16 {
    587
}

fn default_telegram_timeout_secs() -> u64 {
    15
}

/// Optional per-channel notifier sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifiersConfig {
    #[serde(default)]
    pub email: Option<EmailConfig>,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

impl NotifiersConfig {
    /// Resolve configured channels, falling back to environment variables
    /// for channels absent from the config file.
    pub fn resolved(&self) -> Self {
        Self {
            email: self.email.clone().or_else(EmailConfig::from_env),
            telegram: self.telegram.clone().or_else(TelegramConfig::from_env),
        }
    }
}

/// SMTP alert delivery settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub from_address: String,
    pub to_address: String,
    #[serde(default)]
    pub smtp_user: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load from environment variables; `None` when `SMTP_HOST` is not set.
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        let to_address = std::env::var("ALERT_EMAIL_TO").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_smtp_port),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "alerts@wildfire-sentinel.local".to_string()),
            to_address,
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    #[serde(default = "default_telegram_timeout_secs")]
    pub timeout_secs: u64,
}

impl TelegramConfig {
    /// Load from `BOT_TOKEN` / `CHAT_ID`; `None` when either is missing.
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("BOT_TOKEN").ok()?;
        let chat_id = std::env::var("CHAT_ID").ok()?;
        Some(Self {
            bot_token,
            chat_id,
            timeout_secs: default_telegram_timeout_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_by_default() {
        let config = NotifiersConfig::default();
        assert!(config.email.is_none());
        assert!(config.telegram.is_none());
    }

    #[test]
    fn test_telegram_from_yaml() {
        let yaml = r#"
telegram:
  bot_token: "123:abc"
  chat_id: "-100200300"
"#;
        let config: NotifiersConfig = serde_yaml::from_str(yaml).unwrap();
        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.chat_id, "-100200300");
        assert_eq!(telegram.timeout_secs, 15);
    }

    #[test]
    fn test_email_defaults_port() {
        let yaml = r#"
smtp_host: smtp.example.com
from_address: alerts@example.com
to_address: ops@example.com
"#;
        let config: EmailConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.smtp_port, 587);
        assert!(config.smtp_user.is_none());
    }
}
