use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use game::{
    Difficulty, IdentityProvider, Image, ImageCatalog, ImageId, NewScore, ScoreLedger,
    ScoreRecord, UserAggregate, UserId, UserProfile,
};
use sea_orm::sea_query::{Alias, Expr, Func, OnConflict, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use crate::entities::{Tier, images, scores, sessions, users};

#[derive(Debug, FromQueryResult)]
struct UserAverage {
    user_id: Uuid,
    average_score: f64,
    games_played: i64,
}

/// Per-user `AVG`/`COUNT` over the scores table, joined to images when a
/// tier is requested.
fn grouped_scores(difficulty: Option<Difficulty>) -> Select<scores::Entity> {
    let average = Func::cast_as(
        Func::avg(Expr::col((scores::Entity, scores::Column::Score))),
        Alias::new("double precision"),
    );
    let mut query = scores::Entity::find()
        .select_only()
        .column(scores::Column::UserId)
        .column_as(SimpleExpr::from(average), "average_score")
        .column_as(
            SimpleExpr::from(Func::count(Expr::col((scores::Entity, scores::Column::Id)))),
            "games_played",
        )
        .group_by(scores::Column::UserId);
    if let Some(difficulty) = difficulty {
        query = query
            .join(JoinType::InnerJoin, scores::Relation::Images.def())
            .filter(images::Column::Difficulty.eq(Tier::from(difficulty)));
    }
    query
}

/// Catalog, ledger and identity lookups backed by Postgres.
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Inserts `image` unless one with the same URL exists; returns the stored id.
    pub async fn upsert_image(&self, image: &Image) -> Result<ImageId> {
        if let Some(existing) = images::Entity::find()
            .filter(images::Column::Url.eq(image.url.as_str()))
            .one(&self.db)
            .await?
        {
            return Ok(existing.id);
        }
        let model = images::ActiveModel {
            id: Set(image.id),
            url: Set(image.url.clone()),
            ideal_prompt: Set(image.ideal_prompt.clone()),
            difficulty: Set(image.difficulty.into()),
            category: Set(image.category.clone()),
        };
        let stored = model.insert(&self.db).await?;
        Ok(stored.id)
    }

    pub async fn upsert_user(&self, profile: &UserProfile, email: &str) -> Result<()> {
        let model = users::ActiveModel {
            id: Set(profile.id),
            name: Set(profile.display_name.clone()),
            email: Set(email.to_owned()),
            image: Set(profile.avatar_url.clone()),
            created_at: Set(Utc::now()),
        };
        users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_columns([users::Column::Name, users::Column::Email, users::Column::Image])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn insert_session(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let model = sessions::ActiveModel {
            token: Set(token.to_owned()),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
        };
        sessions::Entity::insert(model)
            .on_conflict(
                OnConflict::column(sessions::Column::Token)
                    .update_columns([sessions::Column::UserId, sessions::Column::ExpiresAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ImageCatalog for SeaOrmStore {
    async fn find_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Image>> {
        let rows = images::Entity::find()
            .filter(images::Column::Difficulty.eq(Tier::from(difficulty)))
            .order_by_asc(images::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Image::from).collect())
    }

    async fn find_by_id(&self, id: ImageId) -> Result<Option<Image>> {
        Ok(images::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Image::from))
    }

    async fn list(&self, difficulty: Option<Difficulty>) -> Result<Vec<Image>> {
        let mut query = images::Entity::find();
        if let Some(difficulty) = difficulty {
            query = query.filter(images::Column::Difficulty.eq(Tier::from(difficulty)));
        }
        let rows = query.order_by_asc(images::Column::Id).all(&self.db).await?;
        Ok(rows.into_iter().map(Image::from).collect())
    }
}

#[async_trait]
impl ScoreLedger for SeaOrmStore {
    async fn append(&self, score: NewScore) -> Result<ScoreRecord> {
        let model = scores::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(score.user_id),
            image_id: Set(score.image_id),
            user_prompt: Set(score.user_prompt),
            score: Set(i32::from(score.score)),
            created_at: Set(Utc::now()),
        };
        let stored = model.insert(&self.db).await?;
        Ok(stored.into())
    }

    async fn group_by_user(&self, difficulty: Option<Difficulty>) -> Result<Vec<UserAggregate>> {
        let rows = grouped_scores(difficulty)
            .into_model::<UserAverage>()
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| UserAggregate {
                user_id: row.user_id,
                average_score: row.average_score,
                games_played: row.games_played.max(0) as u64,
            })
            .collect())
    }

    async fn records_for_user(&self, user_id: UserId) -> Result<Vec<ScoreRecord>> {
        let rows = scores::Entity::find()
            .filter(scores::Column::UserId.eq(user_id))
            .order_by_desc(scores::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(ScoreRecord::from).collect())
    }
}

#[async_trait]
impl IdentityProvider for SeaOrmStore {
    async fn resolve_token(&self, token: &str) -> Result<Option<UserId>> {
        let session = sessions::Entity::find_by_id(token.to_owned())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await?;
        Ok(session.map(|s| s.user_id))
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserProfile>> {
        Ok(users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|user| UserProfile {
                id: user.id,
                display_name: user.name,
                avatar_url: user.image,
            }))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait, Value};

    use super::*;

    fn image_model(difficulty: Tier) -> images::Model {
        images::Model {
            id: Uuid::new_v4(),
            url: "/images/lake.jpg".into(),
            ideal_prompt: "A serene mountain lake".into(),
            difficulty,
            category: Some("nature".into()),
        }
    }

    #[test]
    fn filtered_grouping_joins_images() {
        let sql = grouped_scores(Some(Difficulty::Hard))
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains("INNER JOIN \"images\""), "{sql}");
        assert!(sql.contains("GROUP BY \"scores\".\"user_id\""), "{sql}");
        assert!(sql.contains("'hard'"), "{sql}");

        let unfiltered = grouped_scores(None)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(!unfiltered.contains("JOIN"), "{unfiltered}");
        assert!(unfiltered.contains("AVG"), "{unfiltered}");
    }

    #[tokio::test]
    async fn images_map_to_catalog_entries() {
        let model = image_model(Tier::Challenge);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model.clone()]])
            .into_connection();
        let store = SeaOrmStore::new(db);

        let image = store.find_by_id(model.id).await.unwrap().unwrap();
        assert_eq!(image.id, model.id);
        assert_eq!(image.difficulty, Difficulty::Challenge);
        assert_eq!(image.category.as_deref(), Some("nature"));
    }

    #[tokio::test]
    async fn grouped_rows_become_aggregates() {
        let user = Uuid::new_v4();
        let row = BTreeMap::from([
            ("user_id", Value::from(user)),
            ("average_score", Value::from(80.0_f64)),
            ("games_played", Value::from(3_i64)),
        ]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();
        let store = SeaOrmStore::new(db);

        let groups = store.group_by_user(None).await.unwrap();
        assert_eq!(
            groups,
            vec![UserAggregate {
                user_id: user,
                average_score: 80.0,
                games_played: 3,
            }]
        );
    }

    #[tokio::test]
    async fn unknown_tokens_are_anonymous() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<sessions::Model>::new()])
            .into_connection();
        let store = SeaOrmStore::new(db);
        assert_eq!(store.resolve_token("stale").await.unwrap(), None);
    }

    #[tokio::test]
    async fn appended_scores_come_back_as_records() {
        let stored = scores::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            image_id: Uuid::new_v4(),
            user_prompt: "mountain lake pine trees".into(),
            score: 67,
            created_at: Utc::now(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let store = SeaOrmStore::new(db);

        let record = store
            .append(NewScore {
                user_id: stored.user_id,
                image_id: stored.image_id,
                user_prompt: stored.user_prompt.clone(),
                score: 67,
            })
            .await
            .unwrap();
        assert_eq!(record.id, stored.id);
        assert_eq!(record.score, 67);
    }
}
