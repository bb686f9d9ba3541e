use std::fmt;

use entity::tracking_item;

/// Rendered notification, channel-independent.
#[derive(Debug, Clone)]
pub struct Message {
    pub title: String,
    pub to_email: String,
    pub subject: String,
    pub content: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\nTo: {}\nSubject: {}\n{}\n{}",
            self.title,
            "=".repeat(20),
            self.to_email,
            self.subject,
            "-".repeat(20),
            self.content
        )
    }
}

pub fn otp_message(to_email: &str, code: &str, validity_minutes: i64) -> Message {
    Message {
        title: "OTP NOTIFICATION".to_string(),
        to_email: to_email.to_string(),
        subject: "Your TimeWarden OTP Code".to_string(),
        content: format!(
            "Your OTP code is: {code}. This code will expire in {validity_minutes} minutes."
        ),
    }
}

pub fn reminder_message(to_email: &str, item: &tracking_item::Model) -> Message {
    let mut content = format!("\"{}\" is due on {}.", item.title, item.reminder_date);
    if let Some(ref description) = item.description {
        content.push_str(&format!(" {description}"));
    }

    Message {
        title: "REMINDER".to_string(),
        to_email: to_email.to_string(),
        subject: format!("Reminder: {}", item.title),
        content,
    }
}

pub fn batch_reminder_message(to_email: &str, items: &[tracking_item::Model]) -> Message {
    let mut content = format!("You have {} items due:\n", items.len());
    for item in items {
        content.push_str(&format!("- {} (due {})\n", item.title, item.reminder_date));
    }

    Message {
        title: "REMINDER".to_string(),
        to_email: to_email.to_string(),
        subject: format!("You have {} reminders due", items.len()),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(title: &str) -> tracking_item::Model {
        tracking_item::Model {
            id: "item-1".to_string(),
            user_id: "user-1".to_string(),
            category_id: "cat-1".to_string(),
            title: title.to_string(),
            description: None,
            reminder_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            is_done: false,
            created_at: 0,
        }
    }

    #[test]
    fn otp_message_carries_code_and_validity() {
        let message = otp_message("a@x.com", "123456", 2);
        assert!(message.content.contains("123456"));
        assert!(message.content.contains("2 minutes"));
        assert_eq!(message.to_email, "a@x.com");
    }

    #[test]
    fn batch_message_lists_every_item() {
        let items = vec![item("Car warranty"), item("Domain renewal")];
        let message = batch_reminder_message("a@x.com", &items);
        assert!(message.content.contains("Car warranty"));
        assert!(message.content.contains("Domain renewal"));
        assert!(message.subject.contains('2'));
    }

    #[test]
    fn display_renders_the_console_banner() {
        let rendered = otp_message("a@x.com", "123456", 2).to_string();
        assert!(rendered.starts_with("OTP NOTIFICATION\n"));
        assert!(rendered.contains("To: a@x.com"));
    }
}
