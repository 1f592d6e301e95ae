use chrono::{DateTime, Utc};
use game::Difficulty;
use sea_orm::entity::prelude::*;

type DateTimeUtc = DateTime<Utc>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Tier {
    #[sea_orm(string_value = "easy")]
    Easy,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "hard")]
    Hard,
    #[sea_orm(string_value = "challenge")]
    Challenge,
}

impl From<Difficulty> for Tier {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Tier::Easy,
            Difficulty::Medium => Tier::Medium,
            Difficulty::Hard => Tier::Hard,
            Difficulty::Challenge => Tier::Challenge,
        }
    }
}

impl From<Tier> for Difficulty {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Easy => Difficulty::Easy,
            Tier::Medium => Difficulty::Medium,
            Tier::Hard => Difficulty::Hard,
            Tier::Challenge => Difficulty::Challenge,
        }
    }
}

pub mod users {
    use super::*;
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: Option<String>,
        #[sea_orm(unique)]
        pub email: String,
        pub image: Option<String>,
        pub created_at: DateTimeUtc,
    }
    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}
    impl ActiveModelBehavior for ActiveModel {}
}

/// Login sessions issued by the identity provider.
pub mod sessions {
    use super::*;
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "sessions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub token: String,
        pub user_id: Uuid,
        pub expires_at: DateTimeUtc,
    }
    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}
    impl ActiveModelBehavior for ActiveModel {}
}

pub mod images {
    use super::*;
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "images")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub url: String,
        pub ideal_prompt: String,
        pub difficulty: Tier,
        pub category: Option<String>,
    }
    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::scores::Entity")]
        Scores,
    }
    impl Related<super::scores::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Scores.def()
        }
    }
    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for game::Image {
        fn from(model: Model) -> Self {
            game::Image {
                id: model.id,
                url: model.url,
                ideal_prompt: model.ideal_prompt,
                difficulty: model.difficulty.into(),
                category: model.category,
            }
        }
    }
}

pub mod scores {
    use super::*;
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "scores")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        pub image_id: Uuid,
        pub user_prompt: String,
        pub score: i32,
        pub created_at: DateTimeUtc,
    }
    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::images::Entity",
            from = "Column::ImageId",
            to = "super::images::Column::Id"
        )]
        Images,
    }
    impl Related<super::images::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Images.def()
        }
    }
    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for game::ScoreRecord {
        fn from(model: Model) -> Self {
            game::ScoreRecord {
                id: model.id,
                user_id: model.user_id,
                image_id: model.image_id,
                user_prompt: model.user_prompt,
                score: model.score.clamp(0, 100) as u8,
                created_at: model.created_at,
            }
        }
    }
}
