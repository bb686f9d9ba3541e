use thiserror::Error;

/// Authentication failures surfaced to callers.
///
/// Wrong code, expired code, and no-such-request all collapse into
/// `InvalidOrExpired`; signature and expiry problems both collapse into
/// `InvalidToken`. Distinguishable errors would let a caller probe which
/// emails have outstanding requests.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid or expired code")]
    InvalidOrExpired,

    #[error("invalid token")]
    InvalidToken,

    #[error("token signing failed: {0}")]
    Signing(String),

    /// Unexpected storage failure, distinct from the domain errors above.
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

/// Failures of a reminder dispatch cycle.
///
/// Per-owner delivery failures are not errors; they are logged and counted
/// inside the cycle. These variants are the fatal cases that leave the run
/// ledger untouched so the next trigger retries the same window.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("due-item query failed: {0}")]
    Query(#[source] sea_orm::DbErr),

    #[error("run ledger update failed: {0}")]
    Ledger(#[source] sea_orm::DbErr),
}

/// Aggregated startup configuration failure.
///
/// Carries every missing or invalid setting at once so a broken deployment
/// is fixed in one pass, not one restart per field.
#[derive(Debug, Error)]
#[error("invalid configuration: {}", .problems.join("; "))]
pub struct ConfigError {
    pub problems: Vec<String>,
}

impl ConfigError {
    pub fn new(problems: Vec<String>) -> Self {
        Self { problems }
    }

    pub fn single(problem: impl Into<String>) -> Self {
        Self {
            problems: vec![problem.into()],
        }
    }
}
