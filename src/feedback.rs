use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::config::StrategyKind;
use crate::scoring::ProximityScorer;

pub const MAX_PROXIMITY: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterTag {
    Exact,
    Present,
    Absent,
}

impl LetterTag {
    pub fn to_char(self) -> char {
        match self {
            Self::Exact => 'G',
            Self::Present => 'Y',
            Self::Absent => 'X',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Letters(Vec<LetterTag>),
    Proximity(u8),
}

impl Feedback {
    pub fn is_exact(&self) -> bool {
        match self {
            Self::Letters(tags) => tags.iter().all(|t| *t == LetterTag::Exact),
            Self::Proximity(score) => *score == MAX_PROXIMITY,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letters(tags) => tags.iter().try_for_each(|t| write!(f, "{}", t.to_char())),
            Self::Proximity(score) => write!(f, "{score}%"),
        }
    }
}

/// Turns a guess into feedback.
///
/// Callers pass both words uppercased and of equal length; implementations do
/// not re-validate.
#[async_trait]
pub trait FeedbackStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Feedback recorded for a guess that equals the target.
    fn exact_match(&self, len: usize) -> Feedback;

    async fn evaluate(&self, guess: &str, target: &str) -> Feedback;
}

/// Per-position classification against the target.
///
/// A letter that is not in place is `Present` whenever the target contains it
/// at all, even if the guess repeats it more often than the target does.
pub fn letter_feedback(guess: &str, target: &str) -> Vec<LetterTag> {
    let target_chars: Vec<char> = target.chars().collect();
    guess
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if target_chars.get(i) == Some(&c) {
                LetterTag::Exact
            } else if target_chars.contains(&c) {
                LetterTag::Present
            } else {
                LetterTag::Absent
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LetterMatch;

#[async_trait]
impl FeedbackStrategy for LetterMatch {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LetterMatch
    }

    fn exact_match(&self, len: usize) -> Feedback {
        Feedback::Letters(vec![LetterTag::Exact; len])
    }

    async fn evaluate(&self, guess: &str, target: &str) -> Feedback {
        Feedback::Letters(letter_feedback(guess, target))
    }
}

/// Delegates closeness to a remote scorer and never fails: any scorer error
/// becomes a score of 0.
pub struct Proximity {
    scorer: Arc<dyn ProximityScorer>,
}

impl Proximity {
    pub fn new(scorer: Arc<dyn ProximityScorer>) -> Self {
        Self { scorer }
    }
}

fn clamp_proximity(raw: i64) -> u8 {
    // Lossless: the value is clamped into 0..=100 first.
    raw.clamp(0, i64::from(MAX_PROXIMITY)) as u8
}

#[async_trait]
impl FeedbackStrategy for Proximity {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Proximity
    }

    fn exact_match(&self, _len: usize) -> Feedback {
        Feedback::Proximity(MAX_PROXIMITY)
    }

    async fn evaluate(&self, guess: &str, target: &str) -> Feedback {
        if guess.to_uppercase() == target.to_uppercase() {
            return Feedback::Proximity(MAX_PROXIMITY);
        }
        match self.scorer.score(guess, target).await {
            Ok(raw) => Feedback::Proximity(clamp_proximity(raw)),
            Err(e) => {
                log::warn!("Proximity scoring failed for '{guess}': {e}");
                Feedback::Proximity(0)
            }
        }
    }
}
