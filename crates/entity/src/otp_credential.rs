use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One-time passcode issued to an email address.
///
/// At most one live (unused, unexpired) record exists per email: requesting a
/// new code deletes every prior record for that address. Successful
/// verification deletes the record outright rather than flagging it, so a
/// consumed code leaves nothing behind.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "otp_credentials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Indexed but not unique; uniqueness of the live record is enforced by
    /// the delete-before-insert in the auth flow.
    pub email: String,

    /// Fixed-length numeric string.
    pub code: String,

    /// Unix timestamp (seconds).
    pub expires_at: i64,

    pub used: bool,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
