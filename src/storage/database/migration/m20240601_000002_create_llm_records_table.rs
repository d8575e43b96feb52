use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LlmRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LlmRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LlmRecords::Tid)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LlmRecords::Uid).big_integer().not_null())
                    .col(ColumnDef::new(LlmRecords::Biz).string_len(64).not_null())
                    .col(ColumnDef::new(LlmRecords::Tokens).big_integer().not_null())
                    .col(ColumnDef::new(LlmRecords::Amount).big_integer().not_null())
                    .col(ColumnDef::new(LlmRecords::RawOutput).text().not_null())
                    .col(ColumnDef::new(LlmRecords::Ctime).big_integer().not_null())
                    .col(ColumnDef::new(LlmRecords::Utime).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_llm_records_uid_biz")
                    .table(LlmRecords::Table)
                    .col(LlmRecords::Uid)
                    .col(LlmRecords::Biz)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LlmRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LlmRecords {
    Table,
    Id,
    Tid,
    Uid,
    Biz,
    Tokens,
    Amount,
    RawOutput,
    Ctime,
    Utime,
}
