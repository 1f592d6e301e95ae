use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(scores_table())
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_scores_user_id")
                    .table(Scores::Table)
                    .col(Scores::UserId)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await?;
        Ok(())
    }
}

/// Scores cascade away with their player but pin the image they were played on.
fn scores_table() -> TableCreateStatement {
    Table::create()
        .table(Scores::Table)
        .if_not_exists()
        .col(ColumnDef::new(Scores::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Scores::UserId).uuid().not_null())
        .col(ColumnDef::new(Scores::ImageId).uuid().not_null())
        .col(ColumnDef::new(Scores::UserPrompt).text().not_null())
        .col(ColumnDef::new(Scores::Score).integer().not_null())
        .col(
            ColumnDef::new(Scores::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::cust("NOW()")),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_scores_user_id")
                .from(Scores::Table, Scores::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_scores_image_id")
                .from(Scores::Table, Scores::ImageId)
                .to(Images::Table, Images::Id)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .to_owned()
}

#[derive(Iden)]
enum Scores {
    Table,
    Id,
    UserId,
    ImageId,
    UserPrompt,
    Score,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Images {
    Table,
    Id,
}
