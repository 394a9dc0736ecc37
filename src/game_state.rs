use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{GameConfig, StrategyKind};
use crate::feedback::{Feedback, FeedbackStrategy};
use crate::wordbank::{Catalog, WordEntry};
use crate::{debug_log, info_log};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRecord {
    pub word: String,
    pub feedback: Feedback,
}

/// Everything a front end needs to render one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub target: WordEntry,
    pub guesses: Vec<GuessRecord>,
    pub attempts_remaining: u32,
    pub status: GameStatus,
    /// Set while a guess is being scored; further guesses are rejected.
    pub awaiting_feedback: bool,
}

impl GameState {
    fn new(target: WordEntry, max_attempts: u32) -> Self {
        Self {
            target,
            guesses: Vec::new(),
            attempts_remaining: max_attempts,
            status: GameStatus::InProgress,
            awaiting_feedback: false,
        }
    }

    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }
}

/// Clues shown to the player before the first guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint<'a> {
    pub length: usize,
    pub first_letter: char,
    pub definition: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("guess is empty")]
    EmptyGuess,
    #[error("the word must have {expected} letters (got {actual})")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("the game is over; start a new game to keep playing")]
    GameAlreadyOver,
    #[error("still evaluating the previous guess")]
    EvaluationPending,
    #[error("evaluation belongs to a session that has been replaced")]
    StaleEvaluation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    Win { attempts_used: usize },
    Loss { revealed: WordEntry },
    Continue { feedback: Feedback, attempts_remaining: u32 },
}

/// A validated, non-winning guess waiting for its feedback.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingGuess {
    guess: String,
    target: String,
    session: u64,
}

impl PendingGuess {
    pub fn guess(&self) -> &str {
        &self.guess
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GuessStep {
    /// Decided without consulting the strategy (exact match).
    Resolved(GuessOutcome),
    /// Needs `FeedbackStrategy::evaluate` before `Game::complete_guess`.
    Pending(PendingGuess),
}

/// The game engine: one session at a time over an injected catalog.
pub struct Game {
    config: GameConfig,
    catalog: Arc<Catalog>,
    strategy: Arc<dyn FeedbackStrategy>,
    rng: StdRng,
    session: u64,
    state: GameState,
}

impl Game {
    pub fn new(
        config: GameConfig,
        catalog: Arc<Catalog>,
        strategy: Arc<dyn FeedbackStrategy>,
    ) -> Self {
        Self::with_rng(config, catalog, strategy, StdRng::from_os_rng())
    }

    /// Same as [`Game::new`] with a caller-supplied random source, so tests
    /// can pin the target sequence.
    pub fn with_rng(
        config: GameConfig,
        catalog: Arc<Catalog>,
        strategy: Arc<dyn FeedbackStrategy>,
        mut rng: StdRng,
    ) -> Self {
        if config.strategy != strategy.kind() {
            log::warn!(
                "Configured strategy '{}' differs from supplied '{}'; using the supplied one",
                config.strategy,
                strategy.kind()
            );
        }
        let target = catalog.select_target(&mut rng).clone();
        info_log!("Session 0 started with a {}-letter target", target.len());
        let state = GameState::new(target, config.max_attempts);
        Self {
            config,
            catalog,
            strategy,
            rng,
            session: 0,
            state,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn strategy(&self) -> &Arc<dyn FeedbackStrategy> {
        &self.strategy
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn hint(&self) -> Hint<'_> {
        let target = &self.state.target;
        Hint {
            length: target.len(),
            first_letter: target.word.chars().next().unwrap_or(' '),
            definition: &target.definition,
        }
    }

    /// Discard the current session and start a fresh one with a new target.
    pub fn new_game(&mut self) {
        let target = self.catalog.select_target(&mut self.rng).clone();
        self.session += 1;
        self.state = GameState::new(target, self.config.max_attempts);
        info_log!(
            "Session {} started with a {}-letter target",
            self.session,
            self.state.target.len()
        );
    }

    /// Validate a guess and settle it if it wins outright.
    ///
    /// Rejections leave the state untouched. A `Pending` result marks the
    /// state as awaiting feedback until [`Game::complete_guess`] is called.
    pub fn begin_guess(&mut self, raw: &str) -> Result<GuessStep, GuessError> {
        if self.state.is_over() {
            return Err(GuessError::GameAlreadyOver);
        }
        if self.state.awaiting_feedback {
            return Err(GuessError::EvaluationPending);
        }
        if raw.trim().is_empty() {
            return Err(GuessError::EmptyGuess);
        }
        let expected = self.state.target.len();
        let actual = raw.chars().count();
        if actual != expected {
            return Err(GuessError::LengthMismatch { expected, actual });
        }

        // Uppercasing may expand a character (ß -> SS).
        let guess = raw.to_uppercase();
        let normalized = guess.chars().count();
        if normalized != expected {
            return Err(GuessError::LengthMismatch {
                expected,
                actual: normalized,
            });
        }
        if guess == self.state.target.word {
            let feedback = self.strategy.exact_match(expected);
            self.state.guesses.push(GuessRecord {
                word: guess,
                feedback,
            });
            self.state.status = GameStatus::Won;
            let attempts_used = self.state.guesses.len();
            info_log!("Session {} won in {} attempts", self.session, attempts_used);
            return Ok(GuessStep::Resolved(GuessOutcome::Win { attempts_used }));
        }

        self.state.awaiting_feedback = true;
        Ok(GuessStep::Pending(PendingGuess {
            guess,
            target: self.state.target.word.clone(),
            session: self.session,
        }))
    }

    /// Record the feedback for a pending guess and spend one attempt.
    pub fn complete_guess(
        &mut self,
        pending: PendingGuess,
        feedback: Feedback,
    ) -> Result<GuessOutcome, GuessError> {
        if pending.session != self.session {
            return Err(GuessError::StaleEvaluation);
        }
        self.state.awaiting_feedback = false;
        self.state.guesses.push(GuessRecord {
            word: pending.guess,
            feedback: feedback.clone(),
        });
        self.state.attempts_remaining = self.state.attempts_remaining.saturating_sub(1);
        debug_log!(
            "Guess recorded, {} attempts remaining",
            self.state.attempts_remaining
        );

        if self.state.attempts_remaining == 0 {
            self.state.status = GameStatus::Lost;
            info_log!("Session {} lost", self.session);
            return Ok(GuessOutcome::Loss {
                revealed: self.state.target.clone(),
            });
        }
        Ok(GuessOutcome::Continue {
            feedback,
            attempts_remaining: self.state.attempts_remaining,
        })
    }

    /// Validate, evaluate and record one guess.
    pub async fn submit_guess(&mut self, raw: &str) -> Result<GuessOutcome, GuessError> {
        match self.begin_guess(raw)? {
            GuessStep::Resolved(outcome) => Ok(outcome),
            GuessStep::Pending(pending) => {
                let strategy = Arc::clone(&self.strategy);
                let feedback = strategy.evaluate(pending.guess(), pending.target()).await;
                self.complete_guess(pending, feedback)
            }
        }
    }
}

// Interactive session

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    NewGame,
    Exit,
}

/// Display collaborator driven by [`game_loop`].
pub trait GameInterface {
    /// Show the clues and attempt budget of a freshly started session.
    fn display_session_start(&mut self, hint: &Hint<'_>, state: &GameState);
    /// `None` means nothing actionable was entered; the loop asks again.
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_evaluating(&mut self, guess: &str);
    fn display_state(&mut self, state: &GameState);
    fn display_rejection(&mut self, error: &GuessError);
    fn display_win(&mut self, state: &GameState);
    fn display_loss(&mut self, revealed: &WordEntry);
    fn display_new_game_message(&mut self);
    fn display_exit_message(&mut self);
}

pub async fn game_loop<I: GameInterface>(game: &mut Game, interface: &mut I) {
    interface.display_session_start(&game.hint(), game.state());

    loop {
        let Some(action) = interface.read_action() else {
            continue;
        };
        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::NewGame => {
                game.new_game();
                interface.display_new_game_message();
                interface.display_session_start(&game.hint(), game.state());
            }
            UserAction::Guess(raw) => play_guess(game, interface, &raw).await,
        }
    }
}

async fn play_guess<I: GameInterface>(game: &mut Game, interface: &mut I, raw: &str) {
    let step = match game.begin_guess(raw) {
        Ok(step) => step,
        Err(e) => {
            debug_log!("Guess '{}' rejected: {}", raw, e);
            interface.display_rejection(&e);
            return;
        }
    };

    let outcome = match step {
        GuessStep::Resolved(outcome) => outcome,
        GuessStep::Pending(pending) => {
            if game.strategy_kind() == StrategyKind::Proximity {
                interface.display_evaluating(pending.guess());
            }
            let strategy = Arc::clone(game.strategy());
            let feedback = strategy.evaluate(pending.guess(), pending.target()).await;
            match game.complete_guess(pending, feedback) {
                Ok(outcome) => outcome,
                Err(e) => {
                    interface.display_rejection(&e);
                    return;
                }
            }
        }
    };

    interface.display_state(game.state());
    match outcome {
        GuessOutcome::Win { .. } => interface.display_win(game.state()),
        GuessOutcome::Loss { revealed } => interface.display_loss(&revealed),
        GuessOutcome::Continue { .. } => {}
    }
}
