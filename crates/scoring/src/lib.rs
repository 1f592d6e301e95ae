//! Bag-of-words scoring for player prompts.
//!
//! Both prompts are lower-cased and split on whitespace into word sets. The
//! score is the F1 of the player's words against the ideal prompt's words,
//! scaled to `0..=100`. The same functions back the authoritative evaluation
//! and the client preview so the two can never disagree.

pub mod feedback;
pub mod results;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use feedback::{FeedbackTier, MAX_MISSING_KEYWORDS, feedback, missing_keywords};
pub use results::{ResultTier, average, result_message};

/// Highest score a prompt can earn.
pub const MAX_SCORE: u8 = 100;

/// Lower-cases `text` and splits it on whitespace.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

fn word_set(text: &str) -> HashSet<String> {
    tokenize(text).collect()
}

/// Similarity of `user_prompt` to `ideal_prompt` in `0..=100`.
///
/// Repeated words count once. An empty prompt on either side scores 0.
pub fn score(user_prompt: &str, ideal_prompt: &str) -> u8 {
    let ideal_words = word_set(ideal_prompt);
    let user_words = word_set(user_prompt);
    if ideal_words.is_empty() || user_words.is_empty() {
        return 0;
    }

    let matches = ideal_words
        .iter()
        .filter(|word| user_words.contains(*word))
        .count() as f64;
    let coverage = matches / ideal_words.len() as f64;
    let precision = matches / user_words.len() as f64;

    let mut denominator = precision + coverage;
    if denominator == 0.0 {
        denominator = 1.0;
    }
    let f1 = 2.0 * precision * coverage / denominator;

    (f1 * f64::from(MAX_SCORE)).round().clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// Score, feedback and missing keywords for one prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub score: u8,
    pub feedback: String,
    pub missing_keywords: Vec<String>,
}

/// Runs the scorer and the feedback generator over one prompt pair.
pub fn evaluate(user_prompt: &str, ideal_prompt: &str) -> Evaluation {
    let score = score(user_prompt, ideal_prompt);
    let missing_keywords = missing_keywords(user_prompt, ideal_prompt);
    let feedback = feedback(score, &missing_keywords);
    Evaluation {
        score,
        feedback,
        missing_keywords,
    }
}
