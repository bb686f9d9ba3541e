use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Categories table. Predefined categories have no owner.
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::UserId).string())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Categories::IsPredefined)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Categories::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categories_user_id")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .to_owned(),
            )
            .await?;

        // Tracking items table.
        manager
            .create_table(
                Table::create()
                    .table(TrackingItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrackingItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TrackingItems::UserId).string().not_null())
                    .col(ColumnDef::new(TrackingItems::CategoryId).string().not_null())
                    .col(ColumnDef::new(TrackingItems::Title).string().not_null())
                    .col(ColumnDef::new(TrackingItems::Description).string())
                    .col(ColumnDef::new(TrackingItems::ReminderDate).date().not_null())
                    .col(
                        ColumnDef::new(TrackingItems::IsDone)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TrackingItems::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tracking_items_user_id")
                            .from(TrackingItems::Table, TrackingItems::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tracking_items_category_id")
                            .from(TrackingItems::Table, TrackingItems::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tracking_items_user_id")
                    .table(TrackingItems::Table)
                    .col(TrackingItems::UserId)
                    .to_owned(),
            )
            .await?;

        // The due-item query filters on these two columns every cycle.
        manager
            .create_index(
                Index::create()
                    .name("idx_tracking_items_reminder_date")
                    .table(TrackingItems::Table)
                    .col(TrackingItems::ReminderDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tracking_items_is_done")
                    .table(TrackingItems::Table)
                    .col(TrackingItems::IsDone)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse dependency order.
        manager
            .drop_table(Table::drop().table(TrackingItems::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    IsPredefined,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TrackingItems {
    Table,
    Id,
    UserId,
    CategoryId,
    Title,
    Description,
    ReminderDate,
    IsDone,
    CreatedAt,
}
