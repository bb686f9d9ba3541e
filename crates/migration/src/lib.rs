pub use sea_orm_migration::prelude::*;

mod m20260801_000001_users;
mod m20260801_000002_categories_and_items;
mod m20260801_000003_otp_credentials;
mod m20260801_000004_job_runs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_users::Migration),
            Box::new(m20260801_000002_categories_and_items::Migration),
            Box::new(m20260801_000003_otp_credentials::Migration),
            Box::new(m20260801_000004_job_runs::Migration),
        ]
    }
}
