mod console;
mod email;
pub mod messages;

pub use console::ConsoleNotifier;
pub use email::SmtpNotifier;

use std::sync::Arc;

use async_trait::async_trait;

use entity::tracking_item;

use crate::config::{AppConfig, NotificationMode};
use crate::error::ConfigError;

/// Delivery sink for everything the service sends.
///
/// The return value reports delivery success for logging and counting only;
/// the core never retries synchronously. The next scheduled cycle is the
/// retry path for reminders, and the user can simply request another code.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_otp(&self, email: &str, code: &str, validity_minutes: i64) -> bool;

    async fn send_reminder(&self, email: &str, item: &tracking_item::Model) -> bool;

    async fn send_batch_reminders(&self, email: &str, items: &[tracking_item::Model]) -> bool;
}

/// Select the channel once at startup, per configuration.
pub fn build_notifier(config: &AppConfig) -> Result<Arc<dyn Notifier>, ConfigError> {
    match config.notification_mode {
        NotificationMode::Console => Ok(Arc::new(ConsoleNotifier)),
        NotificationMode::Email => {
            let smtp = config
                .smtp
                .as_ref()
                .ok_or_else(|| ConfigError::single("SMTP settings are required when NOTIFICATION_MODE=email"))?;
            Ok(Arc::new(SmtpNotifier::new(smtp)?))
        }
    }
}
