use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Durable record of the last successful completion of a named job.
///
/// Read at startup to decide whether a catch-up pass is owed. `last_run_at`
/// only ever moves forward.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "job_runs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub job_name: String,

    /// Unix timestamp (seconds) of the start of the last completed run.
    pub last_run_at: i64,

    /// Unix timestamp (seconds).
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
