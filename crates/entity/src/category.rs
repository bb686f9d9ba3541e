use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Grouping for tracking items (e.g. "Warranties", "Subscriptions").
///
/// Predefined categories have no owner; user-created ones carry the owning
/// user's id. Category CRUD lives outside this core, but items reference the
/// table so the schema keeps it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner; `None` for predefined categories shared by everyone.
    pub user_id: Option<String>,

    pub name: String,

    pub is_predefined: bool,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
