use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use entity::{otp_credential, user};

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::error::AuthError;
use crate::notify::Notifier;
use crate::{otp, token, util};

/// Passwordless authentication: one-time codes delivered out of band, then
/// signed identity tokens for the session.
pub struct AuthService {
    db: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    secret: Vec<u8>,
    otp_length: usize,
    otp_validity_secs: i64,
    token_ttl_secs: i64,
}

impl AuthService {
    pub fn new(
        db: DatabaseConnection,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: &AppConfig,
    ) -> Self {
        Self {
            db,
            notifier,
            clock,
            secret: config.jwt_secret.as_bytes().to_vec(),
            otp_length: config.otp_length,
            otp_validity_secs: config.otp_validity_minutes * 60,
            token_ttl_secs: config.access_token_expire_minutes * 60,
        }
    }

    /// Issue a fresh code for `email`, invalidating any outstanding one.
    ///
    /// Deliberately does not check whether the email belongs to a registered
    /// account: issuance must not reveal which addresses exist. Callers that
    /// want an enumeration policy apply it above this boundary.
    pub async fn request_code(&self, email: &str) -> Result<(), AuthError> {
        let email = util::normalize_email(email);
        let now = self.clock.now_ts();

        // No stacking: a new request invalidates everything before it.
        otp_credential::Entity::delete_many()
            .filter(otp_credential::Column::Email.eq(&email))
            .exec(&self.db)
            .await?;

        let code = otp::generate_code(self.otp_length);
        otp_credential::ActiveModel {
            id: Set(util::new_id()),
            email: Set(email.clone()),
            code: Set(code.clone()),
            expires_at: Set(now + self.otp_validity_secs),
            used: Set(false),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        let validity_minutes = self.otp_validity_secs / 60;
        if !self.notifier.send_otp(&email, &code, validity_minutes).await {
            tracing::warn!(email = %email, "failed to deliver one-time code");
        }

        Ok(())
    }

    /// Consume a code and return the owning user's id.
    ///
    /// The whole match (email, code, unused, unexpired) rides on a single
    /// conditional delete, so two concurrent attempts race on one row and
    /// exactly one can win. Wrong, expired, and absent codes are
    /// indistinguishable to the caller.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<String, AuthError> {
        let email = util::normalize_email(email);
        let now = self.clock.now_ts();

        let deleted = otp_credential::Entity::delete_many()
            .filter(otp_credential::Column::Email.eq(&email))
            .filter(otp_credential::Column::Code.eq(code))
            .filter(otp_credential::Column::Used.eq(false))
            .filter(otp_credential::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await?;

        if deleted.rows_affected == 0 {
            return Err(AuthError::InvalidOrExpired);
        }

        self.resolve_user(&email, now).await
    }

    /// Map a verified email to a user id, creating the account on first
    /// login. The verified address is the whole identity; there is nothing
    /// else to collect.
    async fn resolve_user(&self, email: &str, now: i64) -> Result<String, AuthError> {
        if let Some(existing) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
        {
            return Ok(existing.id);
        }

        let created = user::ActiveModel {
            id: Set(util::new_id()),
            email: Set(email.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(user_id = %created.id, "created user on first login");
        Ok(created.id)
    }

    pub fn issue_token(&self, user_id: &str) -> Result<String, AuthError> {
        token::issue(&self.secret, user_id, self.clock.now_ts(), self.token_ttl_secs)
    }

    /// Uniform failure: callers learn only that the token is unusable, not
    /// whether the signature or the expiry was at fault.
    pub fn verify_token(&self, raw: &str) -> Result<String, AuthError> {
        token::verify(&self.secret, raw, self.clock.now_ts())
    }

    /// Delete every expired credential; returns the count.
    ///
    /// Safe to run concurrently with verification: verification's own filter
    /// already excludes expired rows, so the race only decides which path
    /// deletes a given row.
    pub async fn cleanup_expired(&self) -> Result<u64, AuthError> {
        let result = otp_credential::Entity::delete_many()
            .filter(otp_credential::Column::ExpiresAt.lt(self.clock.now_ts()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Account-deletion hook: drop every credential for the address.
    pub async fn purge_for_email(&self, email: &str) -> Result<u64, AuthError> {
        let email = util::normalize_email(email);
        let result = otp_credential::Entity::delete_many()
            .filter(otp_credential::Column::Email.eq(&email))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
