use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LlmCreditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LlmCreditLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LlmCreditLogs::Tid)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LlmCreditLogs::Uid).big_integer().not_null())
                    .col(ColumnDef::new(LlmCreditLogs::Biz).string_len(64).not_null())
                    .col(ColumnDef::new(LlmCreditLogs::Amount).big_integer().not_null())
                    .col(ColumnDef::new(LlmCreditLogs::Status).string_len(16).not_null())
                    .col(ColumnDef::new(LlmCreditLogs::Ctime).big_integer().not_null())
                    .col(ColumnDef::new(LlmCreditLogs::Utime).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_llm_credit_logs_uid_status")
                    .table(LlmCreditLogs::Table)
                    .col(LlmCreditLogs::Uid)
                    .col(LlmCreditLogs::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LlmCreditLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LlmCreditLogs {
    Table,
    Id,
    Tid,
    Uid,
    Biz,
    Amount,
    Status,
    Ctime,
    Utime,
}
