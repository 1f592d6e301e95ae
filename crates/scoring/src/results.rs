use serde::{Deserialize, Serialize};

/// Rounded mean of per-round scores, or `None` before any round is scored.
pub fn average(scores: &[u8]) -> Option<u8> {
    if scores.is_empty() {
        return None;
    }
    let total: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    Some((f64::from(total) / scores.len() as f64).round() as u8)
}

/// Bucket for the end-of-game message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultTier {
    Outstanding,
    Great,
    Good,
    NiceEffort,
    KeepPracticing,
}

impl ResultTier {
    pub fn for_score(score: u8) -> Self {
        match score {
            90.. => ResultTier::Outstanding,
            75..=89 => ResultTier::Great,
            60..=74 => ResultTier::Good,
            40..=59 => ResultTier::NiceEffort,
            _ => ResultTier::KeepPracticing,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ResultTier::Outstanding => "Outstanding! You're a prompt engineering master!",
            ResultTier::Great => "Great job! You have strong prompt engineering skills.",
            ResultTier::Good => "Good work! You're on your way to becoming a prompt expert.",
            ResultTier::NiceEffort => "Nice effort! With practice, you'll improve quickly.",
            ResultTier::KeepPracticing => {
                "Keep practicing! Prompt engineering is a skill that develops over time."
            }
        }
    }
}

pub fn result_message(score: u8) -> &'static str {
    ResultTier::for_score(score).message()
}
