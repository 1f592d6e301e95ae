use thiserror::Error;

use crate::models::{Difficulty, ImageId};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid difficulty level `{0}`")]
    InvalidDifficulty(String),
    #[error("prompt must be at least {min} characters")]
    PromptTooShort { min: usize },
    #[error("image {0} not found")]
    ImageNotFound(ImageId),
    #[error("no images available for {0} difficulty")]
    NoImages(Difficulty),
    #[error("image {0} is not the image for the current round")]
    ImageMismatch(ImageId),
    #[error("round {0} has already been submitted")]
    RoundAlreadySubmitted(usize),
    #[error("round {0} has not been submitted yet")]
    RoundNotSubmitted(usize),
    #[error("invalid session: {0}")]
    InvalidSession(&'static str),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl GameError {
    /// Whether the caller sent something the game cannot accept.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GameError::InvalidDifficulty(_)
                | GameError::PromptTooShort { .. }
                | GameError::ImageMismatch(_)
                | GameError::RoundAlreadySubmitted(_)
                | GameError::RoundNotSubmitted(_)
                | GameError::InvalidSession(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GameError::ImageNotFound(_) | GameError::NoImages(_))
    }
}
