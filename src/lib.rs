// Library interface for word-guess
// This allows integration tests to access internal modules

pub mod cli;
pub mod config;
pub mod feedback;
pub mod game_state;
pub mod logging;
pub mod scoring;
pub mod tui;
pub mod wordbank;

use std::sync::Arc;

// Re-export commonly used items for easier testing
pub use config::{GameConfig, ScoringConfig, StrategyKind};
pub use feedback::{Feedback, FeedbackStrategy, LetterMatch, LetterTag, Proximity, letter_feedback};
pub use game_state::{Game, GameState, GameStatus, GuessError, GuessOutcome, game_loop};
pub use scoring::{ChatCompletionScorer, ProximityScorer, ScoringError};
pub use wordbank::{Catalog, CatalogError, WordEntry, load_catalog_from_file, load_catalog_from_str};

/// Build the feedback strategy selected by `kind`.
pub fn build_strategy(kind: StrategyKind, scoring: ScoringConfig) -> Arc<dyn FeedbackStrategy> {
    match kind {
        StrategyKind::LetterMatch => Arc::new(LetterMatch),
        StrategyKind::Proximity => {
            if scoring.api_key.is_none() {
                log::warn!(
                    "{} is not set; every non-winning guess will score 0",
                    config::API_KEY_ENV
                );
            }
            Arc::new(Proximity::new(Arc::new(ChatCompletionScorer::new(scoring))))
        }
    }
}
