//! Notifier: best-effort email to the site owner for each stored message.
//!
//! A missing sender address or credential is `NotifyError::NotConfigured`,
//! which callers treat as a normal, non-fatal outcome.

use std::time::Duration;

use askama::Template;
use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::debug;

use crate::config::MailConfig;
use crate::contact::models::StoredSubmission;
use crate::render::ContactNotificationEmail;

/// Port that expects TLS from the first byte instead of STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TlsMode {
    Implicit,
    StartTls,
}

impl TlsMode {
    fn for_port(port: u16) -> Self {
        if port == IMPLICIT_TLS_PORT {
            TlsMode::Implicit
        } else {
            TlsMode::StartTls
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Mail notifications are not configured")]
    NotConfigured,

    #[error("Invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Failed to render message body: {0}")]
    Render(#[from] askama::Error),
}

/// Outbound notification channel. Carried as `Arc<dyn Notifier>`.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, submission: &StoredSubmission) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone)]
struct SmtpSettings {
    server: String,
    port: u16,
    sender: String,
    password: String,
    recipient: String,
    timeout: Duration,
}

/// Sends notifications through an authenticated SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    settings: Option<SmtpSettings>,
}

impl SmtpNotifier {
    /// `default_recipient` is used when `RECIPIENT_EMAIL` is unset.
    pub fn from_config(mail: &MailConfig, default_recipient: &str) -> Self {
        let settings = match (&mail.sender_email, &mail.sender_password) {
            (Some(sender), Some(password)) => Some(SmtpSettings {
                server: mail.smtp_server.clone(),
                port: mail.smtp_port,
                sender: sender.clone(),
                password: password.clone(),
                recipient: mail
                    .recipient_email
                    .clone()
                    .unwrap_or_else(|| default_recipient.to_string()),
                timeout: mail.timeout,
            }),
            _ => None,
        };
        Self { settings }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_some()
    }

    fn transport(
        settings: &SmtpSettings,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let builder = match TlsMode::for_port(settings.port) {
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.server)?,
            TlsMode::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)?
            }
        };

        Ok(builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.sender.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(settings.timeout))
            .build())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, submission: &StoredSubmission) -> Result<(), NotifyError> {
        let settings = self.settings.as_ref().ok_or(NotifyError::NotConfigured)?;

        let message = build_message(&settings.sender, &settings.recipient, submission)?;
        let transport = Self::transport(settings)?;

        debug!(
            "Sending contact notification via {}:{}",
            settings.server, settings.port
        );
        transport.send(message).await?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|source| NotifyError::Address {
            address: address.to_string(),
            source,
        })
}

/// Builds the HTML notification. The visitor becomes the Reply-To when
/// their address is acceptable to the mail library.
pub fn build_message(
    sender: &str,
    recipient: &str,
    submission: &StoredSubmission,
) -> Result<Message, NotifyError> {
    let body = ContactNotificationEmail {
        name: &submission.name,
        email: &submission.email,
        message: &submission.message,
        timestamp: &submission.timestamp,
    }
    .render()?;

    let mut builder = Message::builder()
        .from(parse_mailbox(sender)?)
        .to(parse_mailbox(recipient)?)
        .subject(format!("New Portfolio Contact from {}", submission.name));

    match submission.email.parse::<Address>() {
        Ok(address) => {
            builder = builder.reply_to(Mailbox::new(Some(submission.name.clone()), address));
        }
        Err(e) => debug!("Skipping Reply-To for '{}': {e}", submission.email),
    }

    Ok(builder.header(ContentType::TEXT_HTML).body(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config(sender: Option<&str>, password: Option<&str>) -> MailConfig {
        MailConfig {
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            sender_email: sender.map(str::to_string),
            sender_password: password.map(str::to_string),
            recipient_email: None,
            timeout: Duration::from_secs(1),
        }
    }

    fn submission() -> StoredSubmission {
        StoredSubmission {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            message: "Hello there".to_string(),
            timestamp: "2025-04-28 09:05:07".to_string(),
            read: false,
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_is_not_configured() {
        for (sender, password) in [
            (None, None),
            (Some("site@example.com"), None),
            (None, Some("secret")),
        ] {
            let notifier =
                SmtpNotifier::from_config(&mail_config(sender, password), "owner@example.com");
            assert!(!notifier.is_configured());
            let err = notifier.notify(&submission()).await.unwrap_err();
            assert!(matches!(err, NotifyError::NotConfigured));
        }
    }

    #[test]
    fn test_recipient_defaults_to_owner_address() {
        let notifier = SmtpNotifier::from_config(
            &mail_config(Some("site@example.com"), Some("secret")),
            "owner@example.com",
        );
        assert!(notifier.is_configured());
        assert_eq!(
            notifier.settings.as_ref().unwrap().recipient,
            "owner@example.com"
        );
    }

    #[test]
    fn test_explicit_recipient_wins() {
        let mut config = mail_config(Some("site@example.com"), Some("secret"));
        config.recipient_email = Some("inbox@example.com".to_string());
        let notifier = SmtpNotifier::from_config(&config, "owner@example.com");
        assert_eq!(
            notifier.settings.as_ref().unwrap().recipient,
            "inbox@example.com"
        );
    }

    #[test]
    fn test_tls_mode_follows_port() {
        assert_eq!(TlsMode::for_port(465), TlsMode::Implicit);
        assert_eq!(TlsMode::for_port(587), TlsMode::StartTls);
        assert_eq!(TlsMode::for_port(25), TlsMode::StartTls);
    }

    #[tokio::test]
    async fn test_transport_builds_for_implicit_and_starttls_ports() {
        for port in [465, 587] {
            let mut config = mail_config(Some("site@example.com"), Some("secret"));
            config.smtp_port = port;
            let notifier = SmtpNotifier::from_config(&config, "owner@example.com");
            let settings = notifier.settings.as_ref().unwrap();
            assert!(
                SmtpNotifier::transport(settings).is_ok(),
                "transport for port {port}"
            );
        }
    }

    #[test]
    fn test_build_message_headers() {
        let message =
            build_message("site@example.com", "owner@example.com", &submission()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: New Portfolio Contact from Alice"));
        assert!(raw.contains("Reply-To:"));
        assert!(raw.contains("owner@example.com"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_build_message_rejects_bad_sender() {
        let err = build_message("not an address", "owner@example.com", &submission()).unwrap_err();
        assert!(matches!(err, NotifyError::Address { .. }));
    }
}
