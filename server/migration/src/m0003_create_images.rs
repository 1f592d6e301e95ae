use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Images::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Images::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Images::Url).text().not_null().unique_key())
                    .col(ColumnDef::new(Images::IdealPrompt).text().not_null())
                    .col(ColumnDef::new(Images::Difficulty).text().not_null())
                    .col(ColumnDef::new(Images::Category).text())
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_images_difficulty")
                    .table(Images::Table)
                    .col(Images::Difficulty)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Images {
    Table,
    Id,
    Url,
    IdealPrompt,
    Difficulty,
    Category,
}
