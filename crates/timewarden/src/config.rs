use chrono_tz::Tz;

use crate::error::ConfigError;
use crate::scheduler;

pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60;
pub const DEFAULT_OTP_VALIDITY_MINUTES: i64 = 2;
pub const DEFAULT_OTP_LENGTH: usize = 6;
/// Daily at 08:00 in the configured zone.
pub const DEFAULT_SCHEDULER_CRON: &str = "0 8 * * *";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationMode {
    Console,
    Email,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Immutable process configuration, built once at startup and passed by
/// reference into every component that needs it. Values like the OTP length
/// travel as explicit parameters from here; there is no settings singleton.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub otp_validity_minutes: i64,
    pub otp_length: usize,
    pub notification_mode: NotificationMode,
    pub scheduler_cron: String,
    pub scheduler_timezone: Tz,
    /// Present exactly when `notification_mode` is `Email`.
    pub smtp: Option<SmtpConfig>,
}

fn normalize_env_value(raw: String) -> String {
    let trimmed = raw.trim();

    if let Some(inner) = trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return inner.trim().to_string();
    }

    trimmed.to_string()
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(normalize_env_value)
        .filter(|s| !s.is_empty())
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// Validation is aggregated: the returned error lists every missing or
    /// invalid setting, never just the first one.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_string)
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut problems: Vec<String> = Vec::new();

        let database_url = get("DATABASE_URL").unwrap_or_else(|| {
            problems.push("DATABASE_URL is required".to_string());
            String::new()
        });

        let jwt_secret = get("JWT_SECRET_KEY").unwrap_or_else(|| {
            problems.push("JWT_SECRET_KEY is required".to_string());
            String::new()
        });

        if let Some(alg) = get("JWT_ALGORITHM") {
            if alg != "HS256" {
                problems.push(format!("JWT_ALGORITHM: only HS256 is supported, got {alg:?}"));
            }
        }

        let access_token_expire_minutes = parse_number(
            &get,
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            &mut problems,
        );
        if access_token_expire_minutes <= 0 {
            problems.push("ACCESS_TOKEN_EXPIRE_MINUTES must be positive".to_string());
        }

        let otp_validity_minutes = parse_number(
            &get,
            "OTP_VALIDITY_MINUTES",
            DEFAULT_OTP_VALIDITY_MINUTES,
            &mut problems,
        );
        if otp_validity_minutes <= 0 {
            problems.push("OTP_VALIDITY_MINUTES must be positive".to_string());
        }

        let otp_length: usize = parse_number(&get, "OTP_LENGTH", DEFAULT_OTP_LENGTH, &mut problems);
        if otp_length == 0 {
            problems.push("OTP_LENGTH must be positive".to_string());
        }

        let notification_mode = match get("NOTIFICATION_MODE") {
            None => NotificationMode::Console,
            Some(raw) => match raw.to_lowercase().as_str() {
                "console" => NotificationMode::Console,
                "email" => NotificationMode::Email,
                other => {
                    problems.push(format!(
                        "NOTIFICATION_MODE: expected \"console\" or \"email\", got {other:?}"
                    ));
                    NotificationMode::Console
                }
            },
        };

        let scheduler_cron =
            get("SCHEDULER_CRON").unwrap_or_else(|| DEFAULT_SCHEDULER_CRON.to_string());
        if let Err(e) = scheduler::parse_cron(&scheduler_cron) {
            problems.push(format!("SCHEDULER_CRON: {e}"));
        }

        let scheduler_timezone = match get("SCHEDULER_TIMEZONE") {
            None => chrono_tz::UTC,
            Some(raw) => raw.parse::<Tz>().unwrap_or_else(|_| {
                problems.push(format!("SCHEDULER_TIMEZONE: unknown time zone {raw:?}"));
                chrono_tz::UTC
            }),
        };

        let smtp = if notification_mode == NotificationMode::Email {
            let mut require = |key: &str| {
                get(key).unwrap_or_else(|| {
                    problems.push(format!("{key} is required when NOTIFICATION_MODE=email"));
                    String::new()
                })
            };

            let host = require("SMTP_HOST");
            let username = require("SMTP_USER");
            let password = require("SMTP_PASSWORD");
            let from = require("SMTP_FROM");
            let port = parse_number(&get, "SMTP_PORT", DEFAULT_SMTP_PORT, &mut problems);

            Some(SmtpConfig {
                host,
                port,
                username,
                password,
                from,
            })
        } else {
            None
        };

        if !problems.is_empty() {
            return Err(ConfigError::new(problems));
        }

        Ok(Self {
            database_url,
            jwt_secret,
            access_token_expire_minutes,
            otp_validity_minutes,
            otp_length,
            notification_mode,
            scheduler_cron,
            scheduler_timezone,
            smtp,
        })
    }
}

fn parse_number<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    problems: &mut Vec<String>,
) -> T
where
    T: std::str::FromStr + Copy,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => default,
        Some(raw) => raw.parse::<T>().unwrap_or_else(|e| {
            problems.push(format!("{key}: {e}"));
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn minimal_settings_yield_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite://timewarden.db"),
            ("JWT_SECRET_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.otp_length, DEFAULT_OTP_LENGTH);
        assert_eq!(config.otp_validity_minutes, DEFAULT_OTP_VALIDITY_MINUTES);
        assert_eq!(
            config.access_token_expire_minutes,
            DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES
        );
        assert_eq!(config.notification_mode, NotificationMode::Console);
        assert_eq!(config.scheduler_timezone, chrono_tz::UTC);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn missing_settings_are_all_reported_at_once() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.problems.iter().any(|p| p.contains("DATABASE_URL")));
        assert!(err.problems.iter().any(|p| p.contains("JWT_SECRET_KEY")));
    }

    #[test]
    fn email_mode_requires_the_whole_smtp_group() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite://timewarden.db"),
            ("JWT_SECRET_KEY", "secret"),
            ("NOTIFICATION_MODE", "email"),
        ]))
        .unwrap_err();

        for key in ["SMTP_HOST", "SMTP_USER", "SMTP_PASSWORD", "SMTP_FROM"] {
            assert!(
                err.problems.iter().any(|p| p.contains(key)),
                "missing {key} not reported: {err}"
            );
        }
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite://timewarden.db"),
            ("JWT_SECRET_KEY", "secret"),
            ("JWT_ALGORITHM", "RS256"),
            ("OTP_LENGTH", "zero"),
            ("SCHEDULER_TIMEZONE", "Mars/Olympus"),
            ("SCHEDULER_CRON", "not a cron"),
        ]))
        .unwrap_err();

        assert!(err.problems.iter().any(|p| p.contains("JWT_ALGORITHM")));
        assert!(err.problems.iter().any(|p| p.contains("OTP_LENGTH")));
        assert!(err
            .problems
            .iter()
            .any(|p| p.contains("SCHEDULER_TIMEZONE")));
        assert!(err.problems.iter().any(|p| p.contains("SCHEDULER_CRON")));
    }

    #[test]
    fn non_positive_lifetimes_are_rejected() {
        // A zero or negative window would mint codes and tokens born expired.
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite://timewarden.db"),
            ("JWT_SECRET_KEY", "secret"),
            ("OTP_VALIDITY_MINUTES", "0"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "-5"),
        ]))
        .unwrap_err();

        assert!(err
            .problems
            .iter()
            .any(|p| p.contains("OTP_VALIDITY_MINUTES must be positive")));
        assert!(err
            .problems
            .iter()
            .any(|p| p.contains("ACCESS_TOKEN_EXPIRE_MINUTES must be positive")));
    }

    #[test]
    fn quoted_env_values_are_normalized() {
        assert_eq!(normalize_env_value("\"console\"".to_string()), "console");
        assert_eq!(normalize_env_value("' email '".to_string()), "email");
        assert_eq!(normalize_env_value("  plain  ".to_string()), "plain");
    }
}
