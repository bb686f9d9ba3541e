//! Reminder-tracking core: passwordless OTP authentication with signed
//! identity tokens, plus a scheduled pipeline that finds due tracking items,
//! batches them per owner, and delivers notifications through a pluggable
//! channel.
//!
//! HTTP routing and request validation live outside this crate; the types
//! here are what such a layer would call into.

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod notify;
pub mod otp;
pub mod reminder;
pub mod scheduler;
pub mod token;
pub mod util;

pub use auth::AuthService;
pub use clock::{Clock, SystemClock};
pub use config::AppConfig;
pub use error::{AuthError, ConfigError, DispatchError};
pub use notify::Notifier;
pub use reminder::{CycleReport, ReminderDispatcher, REMINDER_JOB};
pub use scheduler::{Scheduler, Trigger};
