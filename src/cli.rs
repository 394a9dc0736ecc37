use clap::Parser;
use crate::config::{
    ConfigError, DEFAULT_ENDPOINT, DEFAULT_MAX_ATTEMPTS, DEFAULT_MODEL, GameConfig, ScoringConfig,
    StrategyKind,
};
use crate::feedback::Feedback;
use crate::game_state::{GameInterface, GameState, GameStatus, GuessError, Hint, UserAction};
use crate::wordbank::WordEntry;
use std::io::BufRead;

/// Word guessing game with letter or proximity feedback
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a catalog file with one `WORD|definition` entry per line
    #[arg(short = 'i', long = "input")]
    pub catalog_path: Option<String>,

    /// Number of guesses allowed per game
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Feedback given for each guess
    #[arg(long, value_enum, default_value_t = StrategyKind::LetterMatch)]
    pub strategy: StrategyKind,

    /// Use the full-screen terminal interface
    #[arg(long)]
    pub tui: bool,

    /// Chat-completion endpoint used for proximity scoring
    #[arg(long, env = "WORD_GUESS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Model asked for proximity scores
    #[arg(long, env = "WORD_GUESS_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}

impl Cli {
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        GameConfig::new(self.max_attempts, self.strategy)
    }

    /// Scorer settings; the API key always comes from the environment.
    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            ..ScoringConfig::from_env()
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

pub fn read_action<R: BufRead>(reader: &mut R) -> Option<UserAction> {
    println!("\nEnter your guess ('exit' to quit, 'next' for a new game):");
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => return Some(UserAction::Exit),
        Ok(_) => {}
    }
    let input = input.trim();

    match input.to_uppercase().as_str() {
        "" => None,
        "EXIT" => Some(UserAction::Exit),
        "NEXT" => Some(UserAction::NewGame),
        _ => Some(UserAction::Guess(input.to_string())),
    }
}

pub fn format_feedback(word: &str, feedback: &Feedback) -> String {
    match feedback {
        Feedback::Letters(_) => format!("{word}  {feedback}"),
        Feedback::Proximity(score) => format!("{word}  {score}% proximity"),
    }
}

pub fn display_session_start(hint: &Hint<'_>, state: &GameState) {
    println!("Word length: {}", hint.length);
    println!("First letter: {}", hint.first_letter);
    println!("Definition: {}", hint.definition);
    println!("Attempts remaining: {}", state.attempts_remaining);
}

pub fn display_state(state: &GameState) {
    for guess in &state.guesses {
        println!("{}", format_feedback(&guess.word, &guess.feedback));
    }
    if state.status == GameStatus::InProgress {
        println!("Attempts remaining: {}", state.attempts_remaining);
    }
}

pub fn display_rejection(error: &GuessError) {
    println!("{error}");
}

pub fn display_evaluating(guess: &str) {
    println!("Evaluating {guess}...");
}

pub fn display_win(state: &GameState) {
    println!(
        "Congratulations! You found {} in {} attempts.",
        state.target.word,
        state.guesses.len()
    );
    println!("Type 'next' to play again or 'exit' to quit.");
}

pub fn display_loss(revealed: &WordEntry) {
    println!("Game over! The word was {}.", revealed.word);
    println!("Type 'next' to play again or 'exit' to quit.");
}

pub fn display_exit_message() {
    println!("Exiting.");
}

pub fn display_new_game_message() {
    println!("New game started.");
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and implements the game interface for CLI interaction
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_session_start(&mut self, hint: &Hint<'_>, state: &GameState) {
        display_session_start(hint, state);
    }

    fn read_action(&mut self) -> Option<UserAction> {
        read_action(&mut self.reader)
    }

    fn display_evaluating(&mut self, guess: &str) {
        display_evaluating(guess);
    }

    fn display_state(&mut self, state: &GameState) {
        display_state(state);
    }

    fn display_rejection(&mut self, error: &GuessError) {
        display_rejection(error);
    }

    fn display_win(&mut self, state: &GameState) {
        display_win(state);
    }

    fn display_loss(&mut self, revealed: &WordEntry) {
        display_loss(revealed);
    }

    fn display_new_game_message(&mut self) {
        display_new_game_message();
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}
