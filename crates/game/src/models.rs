use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GameError;
use crate::session::RoundProgress;

pub type UserId = Uuid;
pub type ImageId = Uuid;

/// Rounds in a full playthrough.
pub const ROUNDS_PER_GAME: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Challenge,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Challenge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Challenge => "challenge",
        }
    }

    /// Seconds the player gets per round.
    pub fn time_limit_secs(self) -> u32 {
        match self {
            Difficulty::Easy => 120,
            Difficulty::Medium => 90,
            Difficulty::Hard => 60,
            Difficulty::Challenge => 30,
        }
    }

    /// Tier suggested after finishing a game at this one.
    pub fn next(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard | Difficulty::Challenge => Difficulty::Challenge,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| GameError::InvalidDifficulty(s.to_string()))
    }
}

/// Catalog entry. Never changes once seeded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    pub url: String,
    pub ideal_prompt: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Image {
    pub fn new(
        url: impl Into<String>,
        ideal_prompt: impl Into<String>,
        difficulty: Difficulty,
        category: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            ideal_prompt: ideal_prompt.into(),
            difficulty,
            category,
        }
    }
}

/// What the player sees of an [`Image`]; the ideal prompt stays server-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameImage {
    pub id: ImageId,
    pub url: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&Image> for GameImage {
    fn from(image: &Image) -> Self {
        Self {
            id: image.id,
            url: image.url.clone(),
            difficulty: image.difficulty,
            category: image.category.clone(),
        }
    }
}

/// One playthrough. Lives with the caller between requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: Uuid,
    pub images: Vec<GameImage>,
    pub current_round: usize,
    pub total_rounds: usize,
    pub scores: Vec<u8>,
    pub difficulty: Difficulty,
    pub time_limit: u32,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, images: Vec<GameImage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            total_rounds: images.len(),
            images,
            current_round: 0,
            scores: Vec::new(),
            difficulty,
            time_limit: difficulty.time_limit_secs(),
        }
    }

    pub fn current_image(&self) -> Option<&GameImage> {
        self.images.get(self.current_round)
    }

    pub fn round_submitted(&self) -> bool {
        self.scores.len() > self.current_round
    }

    pub fn is_final_round(&self) -> bool {
        self.current_round + 1 >= self.total_rounds
    }

    pub fn is_complete(&self) -> bool {
        self.is_final_round() && self.round_submitted()
    }

    /// Rounded average of the scores so far.
    pub fn final_score(&self) -> Option<u8> {
        scoring::average(&self.scores)
    }

    /// Checks a session handed back by a caller before acting on it.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.total_rounds == 0 || self.images.len() != self.total_rounds {
            return Err(GameError::InvalidSession("round count does not match images"));
        }
        if self.current_round >= self.total_rounds {
            return Err(GameError::InvalidSession("current round out of range"));
        }
        let scored = self.scores.len();
        if scored != self.current_round && scored != self.current_round + 1 {
            return Err(GameError::InvalidSession("scores do not match current round"));
        }
        if self.scores.iter().any(|&s| s > scoring::MAX_SCORE) {
            return Err(GameError::InvalidSession("score out of range"));
        }
        if self.time_limit != self.difficulty.time_limit_secs() {
            return Err(GameError::InvalidSession("time limit does not match difficulty"));
        }
        Ok(())
    }

    /// Moves to the next round once the current one is scored.
    ///
    /// On the last round this reports [`RoundProgress::Finished`] and leaves
    /// the round index alone; the caller then reads [`GameSession::finish`].
    pub fn advance(&mut self) -> Result<RoundProgress, GameError> {
        self.validate()?;
        if !self.round_submitted() {
            return Err(GameError::RoundNotSubmitted(self.current_round));
        }
        if self.is_final_round() {
            return Ok(RoundProgress::Finished);
        }
        self.current_round += 1;
        Ok(RoundProgress::Next {
            round: self.current_round,
        })
    }

    /// Final result, available once every round has a score.
    pub fn finish(&self) -> Option<FinalResult> {
        if !self.is_complete() {
            return None;
        }
        let score = self.final_score()?;
        Some(FinalResult {
            score,
            difficulty: self.difficulty,
            message: scoring::result_message(score).to_string(),
            next_difficulty: self.difficulty.next(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalResult {
    pub score: u8,
    pub difficulty: Difficulty,
    pub message: String,
    pub next_difficulty: Difficulty,
}

/// Result of evaluating one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameScore {
    pub score: u8,
    pub feedback: String,
    pub missing_keywords: Vec<String>,
    pub ideal_prompt: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub image_id: ImageId,
    pub user_prompt: String,
    pub score: u8,
    pub created_at: DateTime<Utc>,
}

/// A score waiting to be appended to the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewScore {
    pub user_id: UserId,
    pub image_id: ImageId,
    pub user_prompt: String,
    pub score: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Per-user totals produced by grouping the ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct UserAggregate {
    pub user_id: UserId,
    pub average_score: f64,
    pub games_played: u64,
}
