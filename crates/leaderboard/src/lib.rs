pub mod models;

use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Result;
use game::{IdentityProvider, ScoreLedger, UserAggregate, UserId};
pub use models::{
    ANONYMOUS_NAME, DifficultyFilter, LeaderboardEntry, PlayerIdentity, PlayerStats,
};

/// Entries returned when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: usize = 10;

fn display_average(average: f64) -> u8 {
    average.round().clamp(0.0, 100.0) as u8
}

fn rank_order(a: &UserAggregate, b: &UserAggregate) -> Ordering {
    b.average_score
        .total_cmp(&a.average_score)
        .then_with(|| b.games_played.cmp(&a.games_played))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

#[derive(Clone)]
pub struct LeaderboardService {
    ledger: Arc<dyn ScoreLedger>,
    identity: Arc<dyn IdentityProvider>,
}

impl LeaderboardService {
    pub fn new(ledger: Arc<dyn ScoreLedger>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { ledger, identity }
    }

    async fn ranked(&self, filter: DifficultyFilter) -> Result<Vec<UserAggregate>> {
        let mut groups = self.ledger.group_by_user(filter.difficulty()).await?;
        groups.sort_by(rank_order);
        Ok(groups)
    }

    async fn identify(&self, user_id: UserId) -> PlayerIdentity {
        match self.identity.find_user(user_id).await {
            Ok(Some(profile)) => profile.into(),
            Ok(None) => {
                log::debug!("leaderboard user {user_id} has no profile");
                PlayerIdentity::anonymous(user_id)
            }
            Err(err) => {
                log::warn!("profile lookup for {user_id} failed, showing as anonymous: {err:#}");
                PlayerIdentity::anonymous(user_id)
            }
        }
    }

    /// Best players by average score, at most `limit` of them.
    ///
    /// Identities are resolved after truncation, so only the visible rows
    /// cost a lookup.
    pub async fn top(&self, filter: DifficultyFilter, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let mut groups = self.ranked(filter).await?;
        groups.truncate(limit);

        let mut entries = Vec::with_capacity(groups.len());
        for (index, group) in groups.into_iter().enumerate() {
            entries.push(LeaderboardEntry {
                rank: index + 1,
                user: self.identify(group.user_id).await,
                average_score: display_average(group.average_score),
                games_played: group.games_played,
            });
        }
        Ok(entries)
    }

    pub async fn player_stats(&self, user_id: UserId) -> Result<PlayerStats> {
        let records = self.ledger.records_for_user(user_id).await?;
        if records.is_empty() {
            return Ok(PlayerStats::default());
        }

        let scores: Vec<u8> = records.iter().map(|record| record.score).collect();
        let rank = self
            .ranked(DifficultyFilter::All)
            .await?
            .iter()
            .position(|group| group.user_id == user_id)
            .map(|index| index + 1);

        Ok(PlayerStats {
            games_played: scores.len() as u64,
            average_score: scoring::average(&scores).unwrap_or(0),
            best_score: scores.iter().copied().max().unwrap_or(0),
            rank,
        })
    }
}
