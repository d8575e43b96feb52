use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AiConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AiConfigs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AiConfigs::Biz)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AiConfigs::Model).string_len(128).not_null())
                    .col(ColumnDef::new(AiConfigs::Price).big_integer().null())
                    .col(ColumnDef::new(AiConfigs::Temperature).float().not_null())
                    .col(ColumnDef::new(AiConfigs::TopP).float().not_null())
                    .col(ColumnDef::new(AiConfigs::MaxTokens).integer().null())
                    .col(ColumnDef::new(AiConfigs::SystemPrompt).text().not_null())
                    .col(ColumnDef::new(AiConfigs::PromptTemplate).text().not_null())
                    .col(ColumnDef::new(AiConfigs::Ctime).big_integer().not_null())
                    .col(ColumnDef::new(AiConfigs::Utime).big_integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AiConfigs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AiConfigs {
    Table,
    Id,
    Biz,
    Model,
    Price,
    Temperature,
    TopP,
    MaxTokens,
    SystemPrompt,
    PromptTemplate,
    Ctime,
    Utime,
}
