//! Collaborators the game reads from and writes to.
//!
//! Implemented in-process by [`crate::MemoryStore`] and against Postgres by
//! the `storage` crate.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{
    Difficulty, Image, ImageId, NewScore, ScoreRecord, UserAggregate, UserId, UserProfile,
};

#[async_trait]
pub trait ImageCatalog: Send + Sync {
    /// Every image of a tier, ordered by id ascending.
    async fn find_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Image>>;

    async fn find_by_id(&self, id: ImageId) -> Result<Option<Image>>;

    /// Catalog listing, optionally narrowed to one tier.
    async fn list(&self, difficulty: Option<Difficulty>) -> Result<Vec<Image>>;
}

#[async_trait]
pub trait ScoreLedger: Send + Sync {
    /// Appends one evaluated round. Records are never updated.
    async fn append(&self, score: NewScore) -> Result<ScoreRecord>;

    /// Average and count per user, restricted to images of `difficulty` when
    /// given. Order is unspecified.
    async fn group_by_user(&self, difficulty: Option<Difficulty>) -> Result<Vec<UserAggregate>>;

    /// A user's records, newest first.
    async fn records_for_user(&self, user_id: UserId) -> Result<Vec<ScoreRecord>>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// User behind a session token; `None` for unknown or expired tokens.
    async fn resolve_token(&self, token: &str) -> Result<Option<UserId>>;

    async fn find_user(&self, id: UserId) -> Result<Option<UserProfile>>;
}
