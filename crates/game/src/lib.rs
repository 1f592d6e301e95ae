//! Round and session bookkeeping for the prompt game.
//!
//! A [`GameSession`] is created per playthrough and held by the caller; the
//! [`SessionManager`] fills it from an [`ImageCatalog`], scores submissions
//! and appends them to a [`ScoreLedger`] when the player is signed in.

pub mod error;
pub mod memory;
pub mod models;
pub mod ports;
pub mod session;

pub use error::GameError;
pub use memory::MemoryStore;
pub use models::{
    Difficulty, FinalResult, GameImage, GameScore, GameSession, Image, ImageId, NewScore,
    ROUNDS_PER_GAME, ScoreRecord, UserAggregate, UserId, UserProfile,
};
pub use ports::{IdentityProvider, ImageCatalog, ScoreLedger};
pub use session::{
    ImageSelection, MIN_PROMPT_CHARS, RoundProgress, SaveOutcome, Scored, SessionManager,
    validate_prompt,
};
