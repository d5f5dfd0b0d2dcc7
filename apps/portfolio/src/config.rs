use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Application configuration loaded from environment variables.
/// Nothing is strictly required: the mail settings only enable notifications.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub messages_path: PathBuf,
    pub content_path: PathBuf,
    pub images_dir: PathBuf,
    pub mail: MailConfig,
}

/// Outbound mail settings for contact notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct MailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    /// Falls back to the profile email from the content file when unset.
    pub recipient_email: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            messages_path: lookup("MESSAGES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/messages.json")),
            content_path: lookup("CONTENT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("content/portfolio.json")),
            images_dir: lookup("IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("images")),
            mail: MailConfig {
                smtp_server: non_empty(lookup("SMTP_SERVER"))
                    .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
                smtp_port: parse_or(&lookup, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
                sender_email: non_empty(lookup("SENDER_EMAIL")),
                sender_password: non_empty(lookup("SENDER_PASSWORD")),
                recipient_email: non_empty(lookup("RECIPIENT_EMAIL")),
                timeout: Duration::from_secs(parse_or(&lookup, "NOTIFY_TIMEOUT_SECS", 10u64)?),
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty(lookup(key)) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
