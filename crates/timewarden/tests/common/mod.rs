#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use entity::{category, job_run, tracking_item, user};
use timewarden::config::{AppConfig, NotificationMode, DEFAULT_SCHEDULER_CRON};
use timewarden::{Clock, Notifier};

/// Fresh in-memory store with the full schema applied. Single connection:
/// every pooled connection to `sqlite::memory:` would otherwise get its own
/// database.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);
    options.sqlx_logging(false);

    let db = Database::connect(options).await.expect("connect");
    Migrator::up(&db, None).await.expect("migrate");
    db
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-signing-secret".to_string(),
        access_token_expire_minutes: 60,
        otp_validity_minutes: 2,
        otp_length: 6,
        notification_mode: NotificationMode::Console,
        scheduler_cron: DEFAULT_SCHEDULER_CRON.to_string(),
        scheduler_timezone: chrono_tz::UTC,
        smtp: None,
    }
}

/// Pinnable clock; tests move time instead of sleeping.
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn at_ymd_hms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Self {
        Self::at(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Otp {
        email: String,
        code: String,
    },
    Single {
        email: String,
        title: String,
    },
    Batch {
        email: String,
        titles: Vec<String>,
    },
}

/// Records every send; can be told to report failure for specific recipients
/// and to stall so overlap behavior is observable.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Sent>>,
    pub fail_for: Mutex<HashSet<String>>,
    pub delay: Mutex<Option<Duration>>,
}

impl RecordingNotifier {
    pub fn fail_for(&self, email: &str) {
        self.fail_for.lock().unwrap().insert(email.to_string());
    }

    pub fn delay(&self, by: Duration) {
        *self.delay.lock().unwrap() = Some(by);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_otp_code(&self, email: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find_map(|entry| match entry {
                Sent::Otp { email: to, code } if to == email => Some(code),
                _ => None,
            })
    }

    async fn finish(&self, email: &str, entry: Sent) -> bool {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.sent.lock().unwrap().push(entry);
        !self.fail_for.lock().unwrap().contains(email)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_otp(&self, email: &str, code: &str, _validity_minutes: i64) -> bool {
        self.finish(
            email,
            Sent::Otp {
                email: email.to_string(),
                code: code.to_string(),
            },
        )
        .await
    }

    async fn send_reminder(&self, email: &str, item: &tracking_item::Model) -> bool {
        self.finish(
            email,
            Sent::Single {
                email: email.to_string(),
                title: item.title.clone(),
            },
        )
        .await
    }

    async fn send_batch_reminders(&self, email: &str, items: &[tracking_item::Model]) -> bool {
        self.finish(
            email,
            Sent::Batch {
                email: email.to_string(),
                titles: items.iter().map(|item| item.title.clone()).collect(),
            },
        )
        .await
    }
}

pub async fn seed_user(db: &DatabaseConnection, id: &str, email: &str) -> String {
    user::ActiveModel {
        id: Set(id.to_string()),
        email: Set(email.to_string()),
        created_at: Set(0),
        updated_at: Set(0),
    }
    .insert(db)
    .await
    .expect("seed user");
    id.to_string()
}

pub async fn seed_category(db: &DatabaseConnection, id: &str) -> String {
    category::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(None),
        name: Set("General".to_string()),
        is_predefined: Set(true),
        created_at: Set(0),
    }
    .insert(db)
    .await
    .expect("seed category");
    id.to_string()
}

pub async fn seed_item(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
    category_id: &str,
    title: &str,
    reminder_date: NaiveDate,
    is_done: bool,
) {
    tracking_item::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        category_id: Set(category_id.to_string()),
        title: Set(title.to_string()),
        description: Set(None),
        reminder_date: Set(reminder_date),
        is_done: Set(is_done),
        created_at: Set(0),
    }
    .insert(db)
    .await
    .expect("seed item");
}

pub async fn seed_job_run(db: &DatabaseConnection, job_name: &str, last_run_at: i64) {
    job_run::ActiveModel {
        job_name: Set(job_name.to_string()),
        last_run_at: Set(last_run_at),
        updated_at: Set(last_run_at),
    }
    .insert(db)
    .await
    .expect("seed job run");
}
