use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use entity::tracking_item;

use crate::config::SmtpConfig;
use crate::error::ConfigError;

use super::{messages, Notifier};

/// Delivers rendered messages over SMTP (STARTTLS on the configured port).
///
/// Transport and address errors are logged and reported as a failed send;
/// they never propagate into the calling flow.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, ConfigError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| ConfigError::single(format!("SMTP_HOST: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| ConfigError::single(format!("SMTP_FROM: {e}")))?;

        Ok(Self { transport, from })
    }

    async fn deliver(&self, message: &messages::Message) -> bool {
        let to: Mailbox = match message.to_email.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                tracing::warn!(to = %message.to_email, error = %e, "invalid recipient address");
                return false;
            }
        };

        let email = match lettre::Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&message.subject)
            .body(message.content.clone())
        {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!(to = %message.to_email, error = %e, "failed to build email");
                return false;
            }
        };

        match self.transport.send(email).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(to = %message.to_email, error = %e, "smtp delivery failed");
                false
            }
        }
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_otp(&self, email: &str, code: &str, validity_minutes: i64) -> bool {
        self.deliver(&messages::otp_message(email, code, validity_minutes))
            .await
    }

    async fn send_reminder(&self, email: &str, item: &tracking_item::Model) -> bool {
        self.deliver(&messages::reminder_message(email, item)).await
    }

    async fn send_batch_reminders(&self, email: &str, items: &[tracking_item::Model]) -> bool {
        self.deliver(&messages::batch_reminder_message(email, items))
            .await
    }
}
