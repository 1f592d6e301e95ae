use std::str::FromStr;

use game::{Difficulty, GameError, UserId, UserProfile};
use serde::{Deserialize, Serialize};

/// Shown for players whose profile can no longer be found.
pub const ANONYMOUS_NAME: &str = "Anonymous User";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    pub fn difficulty(self) -> Option<Difficulty> {
        match self {
            DifficultyFilter::All => None,
            DifficultyFilter::Only(d) => Some(d),
        }
    }
}

impl From<Option<Difficulty>> for DifficultyFilter {
    fn from(difficulty: Option<Difficulty>) -> Self {
        difficulty.map_or(DifficultyFilter::All, DifficultyFilter::Only)
    }
}

impl FromStr for DifficultyFilter {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(DifficultyFilter::All),
            other => other.parse().map(DifficultyFilter::Only),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: UserId,
    pub name: String,
    pub image: Option<String>,
}

impl PlayerIdentity {
    pub fn anonymous(id: UserId) -> Self {
        Self {
            id,
            name: ANONYMOUS_NAME.to_string(),
            image: None,
        }
    }
}

impl From<UserProfile> for PlayerIdentity {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile
                .display_name
                .unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
            image: profile.avatar_url,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user: PlayerIdentity,
    pub average_score: u8,
    pub games_played: u64,
}

/// Dashboard figures for one player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub games_played: u64,
    pub average_score: u8,
    pub best_score: u8,
    pub rank: Option<usize>,
}
