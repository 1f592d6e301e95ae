use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    Difficulty, Image, ImageId, NewScore, ScoreRecord, UserAggregate, UserId, UserProfile,
};
use crate::ports::{IdentityProvider, ImageCatalog, ScoreLedger};

#[derive(Default)]
struct Inner {
    images: BTreeMap<ImageId, Image>,
    scores: Vec<ScoreRecord>,
    users: HashMap<UserId, UserProfile>,
    tokens: HashMap<String, UserId>,
}

/// In-process catalog, ledger and identity store.
///
/// Used by tests and by the server when no database is configured. Clones
/// share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        match self.inner.read() {
            Ok(inner) => inner,
            Err(e) => e.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        match self.inner.write() {
            Ok(inner) => inner,
            Err(e) => e.into_inner(),
        }
    }

    /// Adds `image`, or returns the id already stored under the same URL.
    pub fn insert_image(&self, image: Image) -> ImageId {
        let mut inner = self.write();
        if let Some(existing) = inner.images.values().find(|i| i.url == image.url) {
            return existing.id;
        }
        let id = image.id;
        inner.images.insert(id, image);
        id
    }

    pub fn remove_image(&self, id: ImageId) -> Option<Image> {
        self.write().images.remove(&id)
    }

    pub fn insert_user(&self, profile: UserProfile) {
        self.write().users.insert(profile.id, profile);
    }

    pub fn remove_user(&self, id: UserId) -> Option<UserProfile> {
        self.write().users.remove(&id)
    }

    pub fn insert_token(&self, token: impl Into<String>, user_id: UserId) {
        self.write().tokens.insert(token.into(), user_id);
    }

    /// Every score record, oldest first.
    pub fn scores(&self) -> Vec<ScoreRecord> {
        self.read().scores.clone()
    }
}

#[async_trait]
impl ImageCatalog for MemoryStore {
    async fn find_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Image>> {
        Ok(self
            .read()
            .images
            .values()
            .filter(|image| image.difficulty == difficulty)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ImageId) -> Result<Option<Image>> {
        Ok(self.read().images.get(&id).cloned())
    }

    async fn list(&self, difficulty: Option<Difficulty>) -> Result<Vec<Image>> {
        Ok(self
            .read()
            .images
            .values()
            .filter(|image| difficulty.is_none_or(|d| image.difficulty == d))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ScoreLedger for MemoryStore {
    async fn append(&self, score: NewScore) -> Result<ScoreRecord> {
        let record = ScoreRecord {
            id: Uuid::new_v4(),
            user_id: score.user_id,
            image_id: score.image_id,
            user_prompt: score.user_prompt,
            score: score.score,
            created_at: Utc::now(),
        };
        self.write().scores.push(record.clone());
        Ok(record)
    }

    async fn group_by_user(&self, difficulty: Option<Difficulty>) -> Result<Vec<UserAggregate>> {
        let inner = self.read();
        let mut totals: BTreeMap<UserId, (u64, u64)> = BTreeMap::new();
        for record in &inner.scores {
            if let Some(difficulty) = difficulty {
                // records whose image is gone drop out of filtered views
                let matches = inner
                    .images
                    .get(&record.image_id)
                    .is_some_and(|image| image.difficulty == difficulty);
                if !matches {
                    continue;
                }
            }
            let entry = totals.entry(record.user_id).or_default();
            entry.0 += u64::from(record.score);
            entry.1 += 1;
        }
        Ok(totals
            .into_iter()
            .map(|(user_id, (sum, count))| UserAggregate {
                user_id,
                average_score: sum as f64 / count as f64,
                games_played: count,
            })
            .collect())
    }

    async fn records_for_user(&self, user_id: UserId) -> Result<Vec<ScoreRecord>> {
        let mut records: Vec<ScoreRecord> = self
            .read()
            .scores
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.reverse();
        Ok(records)
    }
}

#[async_trait]
impl IdentityProvider for MemoryStore {
    async fn resolve_token(&self, token: &str) -> Result<Option<UserId>> {
        Ok(self.read().tokens.get(token).copied())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserProfile>> {
        Ok(self.read().users.get(&id).cloned())
    }
}
