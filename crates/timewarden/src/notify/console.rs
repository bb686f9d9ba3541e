use async_trait::async_trait;

use entity::tracking_item;

use super::{messages, Notifier};

/// Logs rendered messages instead of delivering them. The default mode for
/// development setups without an SMTP relay.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send_otp(&self, email: &str, code: &str, validity_minutes: i64) -> bool {
        tracing::info!("\n{}", messages::otp_message(email, code, validity_minutes));
        true
    }

    async fn send_reminder(&self, email: &str, item: &tracking_item::Model) -> bool {
        tracing::info!("\n{}", messages::reminder_message(email, item));
        true
    }

    async fn send_batch_reminders(&self, email: &str, items: &[tracking_item::Model]) -> bool {
        tracing::info!("\n{}", messages::batch_reminder_message(email, items));
        true
    }
}
