use std::str::FromStr;
use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GameError;
use crate::models::{
    Difficulty, GameImage, GameScore, GameSession, Image, ImageId, NewScore, ROUNDS_PER_GAME, UserId,
};
use crate::ports::{ImageCatalog, ScoreLedger};

/// Shortest prompt accepted for evaluation, after trimming.
pub const MIN_PROMPT_CHARS: usize = 10;

/// Rejects prompts too short to be worth scoring.
///
/// Runs at the request boundary; the scorer itself accepts anything.
pub fn validate_prompt(prompt: &str) -> Result<(), GameError> {
    if prompt.trim().chars().count() < MIN_PROMPT_CHARS {
        return Err(GameError::PromptTooShort {
            min: MIN_PROMPT_CHARS,
        });
    }
    Ok(())
}

/// How a session's images are drawn from the tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageSelection {
    /// Uniform sample without replacement.
    #[default]
    Random,
    /// The first images by id.
    Ordered,
}

impl FromStr for ImageSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(ImageSelection::Random),
            "ordered" => Ok(ImageSelection::Ordered),
            other => Err(format!("unknown image selection `{other}`")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum RoundProgress {
    Next { round: usize },
    Finished,
}

/// What happened to the score record for an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nobody signed in, nothing to record.
    Anonymous,
    Saved(Uuid),
    /// The ledger write failed; the player still got their score.
    Failed,
}

#[derive(Clone, Debug)]
pub struct Scored {
    pub result: GameScore,
    pub saved: SaveOutcome,
}

fn select_images(images: &mut Vec<Image>, selection: ImageSelection, rounds: usize) {
    match selection {
        ImageSelection::Random => images.shuffle(&mut rand::thread_rng()),
        ImageSelection::Ordered => images.sort_by_key(|image| image.id),
    }
    images.truncate(rounds);
}

#[derive(Clone)]
pub struct SessionManager {
    catalog: Arc<dyn ImageCatalog>,
    ledger: Arc<dyn ScoreLedger>,
    rounds: usize,
    selection: ImageSelection,
}

impl SessionManager {
    pub fn new(catalog: Arc<dyn ImageCatalog>, ledger: Arc<dyn ScoreLedger>) -> Self {
        Self {
            catalog,
            ledger,
            rounds: ROUNDS_PER_GAME,
            selection: ImageSelection::default(),
        }
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds.max(1);
        self
    }

    pub fn with_selection(mut self, selection: ImageSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Starts a playthrough at `difficulty`.
    ///
    /// A tier with fewer images than the configured round count yields a
    /// shorter game rather than repeating images.
    pub async fn create_session(&self, difficulty: Difficulty) -> Result<GameSession, GameError> {
        let mut images = self.catalog.find_by_difficulty(difficulty).await?;
        if images.is_empty() {
            return Err(GameError::NoImages(difficulty));
        }
        select_images(&mut images, self.selection, self.rounds);

        let session = GameSession::new(difficulty, images.iter().map(GameImage::from).collect());
        log::info!(
            "created {} session {} with {} rounds",
            difficulty,
            session.id,
            session.total_rounds
        );
        Ok(session)
    }

    /// Scores `prompt` against the image's ideal prompt.
    ///
    /// For a signed-in `user` the score is appended to the ledger. A failed
    /// append is logged and reported in [`Scored::saved`]; the score itself is
    /// still returned.
    pub async fn evaluate(
        &self,
        image_id: ImageId,
        prompt: &str,
        user: Option<UserId>,
    ) -> Result<Scored, GameError> {
        let image = self
            .catalog
            .find_by_id(image_id)
            .await?
            .ok_or(GameError::ImageNotFound(image_id))?;

        let evaluation = scoring::evaluate(prompt, &image.ideal_prompt);

        let saved = match user {
            None => SaveOutcome::Anonymous,
            Some(user_id) => {
                let record = NewScore {
                    user_id,
                    image_id,
                    user_prompt: prompt.to_owned(),
                    score: evaluation.score,
                };
                match self.ledger.append(record).await {
                    Ok(stored) => SaveOutcome::Saved(stored.id),
                    Err(err) => {
                        log::warn!(
                            "failed to record score for user {user_id} on image {image_id}: {err:#}"
                        );
                        SaveOutcome::Failed
                    }
                }
            }
        };

        Ok(Scored {
            result: GameScore {
                score: evaluation.score,
                feedback: evaluation.feedback,
                missing_keywords: evaluation.missing_keywords,
                ideal_prompt: image.ideal_prompt,
            },
            saved,
        })
    }

    /// Evaluates the current round of `session` and records its score.
    pub async fn submit_round(
        &self,
        session: &mut GameSession,
        image_id: ImageId,
        prompt: &str,
        user: Option<UserId>,
    ) -> Result<Scored, GameError> {
        session.validate()?;
        if session.round_submitted() {
            return Err(GameError::RoundAlreadySubmitted(session.current_round));
        }
        if session.current_image().map(|image| image.id) != Some(image_id) {
            return Err(GameError::ImageMismatch(image_id));
        }

        let scored = self.evaluate(image_id, prompt, user).await?;
        session.scores.push(scored.result.score);
        log::debug!(
            "session {} round {} scored {}",
            session.id,
            session.current_round,
            scored.result.score
        );
        Ok(scored)
    }

    /// Same as [`GameSession::advance`].
    pub fn advance_round(&self, session: &mut GameSession) -> Result<RoundProgress, GameError> {
        let progress = session.advance()?;
        if progress == RoundProgress::Finished {
            log::info!(
                "session {} finished with {:?}",
                session.id,
                session.final_score()
            );
        }
        Ok(progress)
    }
}
