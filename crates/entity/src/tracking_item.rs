use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A thing with an expiry the user wants to be reminded about
/// (warranty, license, subscription, ...).
///
/// The reminder pipeline reads these and never mutates them; an item stays
/// due until its owner marks it done.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tracking_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub category_id: String,

    pub title: String,

    pub description: Option<String>,

    /// Date granularity: the item becomes due on this day's first cycle.
    pub reminder_date: Date,

    pub is_done: bool,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
