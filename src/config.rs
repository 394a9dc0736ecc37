use std::fmt;
use thiserror::Error;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max attempts must be at least 1")]
    ZeroAttempts,
}

/// Which feedback the session hands back for a non-winning guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StrategyKind {
    /// Per-letter exact / present / absent marks
    #[default]
    #[value(name = "letter")]
    LetterMatch,
    /// 0-100 closeness score from a language model
    Proximity,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LetterMatch => write!(f, "letter"),
            Self::Proximity => write!(f, "proximity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub max_attempts: u32,
    pub strategy: StrategyKind,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            strategy: StrategyKind::default(),
        }
    }
}

impl GameConfig {
    pub fn new(max_attempts: u32, strategy: StrategyKind) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(Self {
            max_attempts,
            strategy,
        })
    }
}

/// Connection settings for the remote proximity scorer.
#[derive(Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl ScoringConfig {
    /// Defaults with the API key taken from `OPENAI_API_KEY`, if set.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()),
            ..Self::default()
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

// Keeps the key out of logs.
impl fmt::Debug for ScoringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
