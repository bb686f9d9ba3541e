use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OtpCredentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OtpCredentials::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OtpCredentials::Email).string().not_null())
                    .col(ColumnDef::new(OtpCredentials::Code).string().not_null())
                    .col(
                        ColumnDef::new(OtpCredentials::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OtpCredentials::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(OtpCredentials::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_otp_credentials_email")
                    .table(OtpCredentials::Table)
                    .col(OtpCredentials::Email)
                    .to_owned(),
            )
            .await?;

        // The expiry sweep scans on this column.
        manager
            .create_index(
                Index::create()
                    .name("idx_otp_credentials_expires_at")
                    .table(OtpCredentials::Table)
                    .col(OtpCredentials::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let _ = manager
            .drop_index(Index::drop().name("idx_otp_credentials_email").to_owned())
            .await;
        let _ = manager
            .drop_index(
                Index::drop()
                    .name("idx_otp_credentials_expires_at")
                    .to_owned(),
            )
            .await;

        manager
            .drop_table(Table::drop().table(OtpCredentials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OtpCredentials {
    Table,
    Id,
    Email,
    Code,
    ExpiresAt,
    Used,
    CreatedAt,
}
