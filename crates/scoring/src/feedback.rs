use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::tokenize;

/// Most keywords reported back to the player.
pub const MAX_MISSING_KEYWORDS: usize = 3;

// Words this short are treated as filler ("a", "the", "with").
const MIN_KEYWORD_CHARS: usize = 4;

/// Ideal-prompt words the player left out, in ideal-prompt order.
pub fn missing_keywords(user_prompt: &str, ideal_prompt: &str) -> Vec<String> {
    let user_words: HashSet<String> = tokenize(user_prompt).collect();
    tokenize(ideal_prompt)
        .filter(|word| word.chars().count() >= MIN_KEYWORD_CHARS && !user_words.contains(word))
        .take(MAX_MISSING_KEYWORDS)
        .collect()
}

/// Score bucket that selects a feedback message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    Excellent,
    GoodJob,
    NiceStart,
    KeepPracticing,
}

impl FeedbackTier {
    pub fn for_score(score: u8) -> Self {
        match score {
            90.. => FeedbackTier::Excellent,
            70..=89 => FeedbackTier::GoodJob,
            50..=69 => FeedbackTier::NiceStart,
            _ => FeedbackTier::KeepPracticing,
        }
    }
}

/// Canned feedback for `score`, naming `missing` where the tier calls for it.
pub fn feedback(score: u8, missing: &[String]) -> String {
    let missing = missing.join(", ");
    match FeedbackTier::for_score(score) {
        FeedbackTier::Excellent => {
            "Excellent! Your description captures all the key elements perfectly.".to_string()
        }
        FeedbackTier::GoodJob => format!(
            "Good job! You identified most key elements. The ideal prompt also included: \"{missing}\"."
        ),
        FeedbackTier::NiceStart => format!(
            "Nice start! You captured some elements, but missed: \"{missing}\". Try to be more detailed in your descriptions."
        ),
        FeedbackTier::KeepPracticing => format!(
            "Keep practicing! Your description missed key elements like: \"{missing}\". Remember to describe all visible objects, colors, and atmosphere."
        ),
    }
}
