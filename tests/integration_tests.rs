// Integration tests for the word-guess application
// These tests verify that all modules work together correctly

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use word_guess::cli::CliInterface;
use word_guess::game_state::{GameInterface, Hint, UserAction};
use word_guess::*;

/// Scorer that replays a script of replies and counts calls.
struct ScriptedScorer {
    replies: Vec<Option<i64>>,
    calls: AtomicUsize,
}

impl ScriptedScorer {
    fn new(replies: Vec<Option<i64>>) -> Arc<Self> {
        Arc::new(Self {
            replies,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProximityScorer for ScriptedScorer {
    async fn score(&self, _candidate: &str, _target: &str) -> Result<i64, ScoringError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(call).copied().flatten() {
            Some(score) => Ok(score),
            None => Err(ScoringError::Status(503)),
        }
    }
}

/// Interface that records what the loop told it.
#[derive(Default)]
struct RecordingInterface {
    actions: Vec<UserAction>,
    sessions: Vec<(usize, char, String)>,
    rejections: Vec<GuessError>,
    evaluating: Vec<String>,
    states: Vec<GameState>,
    wins: usize,
    losses: Vec<String>,
    new_games: usize,
    exited: bool,
}

impl RecordingInterface {
    fn with_actions(actions: Vec<UserAction>) -> Self {
        let mut actions = actions;
        actions.reverse();
        Self {
            actions,
            ..Self::default()
        }
    }
}

impl GameInterface for RecordingInterface {
    fn display_session_start(&mut self, hint: &Hint<'_>, _state: &GameState) {
        self.sessions
            .push((hint.length, hint.first_letter, hint.definition.to_string()));
    }

    fn read_action(&mut self) -> Option<UserAction> {
        Some(self.actions.pop().unwrap_or(UserAction::Exit))
    }

    fn display_evaluating(&mut self, guess: &str) {
        self.evaluating.push(guess.to_string());
    }

    fn display_state(&mut self, state: &GameState) {
        self.states.push(state.clone());
    }

    fn display_rejection(&mut self, error: &GuessError) {
        self.rejections.push(error.clone());
    }

    fn display_win(&mut self, _state: &GameState) {
        self.wins += 1;
    }

    fn display_loss(&mut self, revealed: &WordEntry) {
        self.losses.push(revealed.word.clone());
    }

    fn display_new_game_message(&mut self) {
        self.new_games += 1;
    }

    fn display_exit_message(&mut self) {
        self.exited = true;
    }
}

fn guess(word: &str) -> UserAction {
    UserAction::Guess(word.to_string())
}

fn single_word_catalog(word: &str, definition: &str) -> Arc<Catalog> {
    Arc::new(Catalog::new(vec![WordEntry::new(word, definition)]).unwrap())
}

fn letter_game(catalog: Arc<Catalog>) -> Game {
    Game::with_rng(
        GameConfig::default(),
        catalog,
        Arc::new(LetterMatch),
        StdRng::seed_from_u64(42),
    )
}

fn proximity_game(catalog: Arc<Catalog>, scorer: Arc<ScriptedScorer>) -> Game {
    Game::with_rng(
        GameConfig::new(6, StrategyKind::Proximity).unwrap(),
        catalog,
        Arc::new(Proximity::new(scorer)),
        StdRng::seed_from_u64(42),
    )
}

#[tokio::test]
async fn test_cli_game_win_then_exit() {
    let mut game = letter_game(single_word_catalog("CLOUD", "Water in the sky"));
    let reader = Cursor::new("beach\ncloud\nexit\n");
    let mut interface = CliInterface::new(reader);

    game_loop(&mut game, &mut interface).await;

    assert_eq!(game.state().status, GameStatus::Won);
    assert_eq!(game.state().guesses.len(), 2);
    assert_eq!(game.state().attempts_remaining, 5);
}

#[tokio::test]
async fn test_cli_game_ends_on_end_of_input() {
    let mut game = letter_game(single_word_catalog("CLOUD", "Water in the sky"));
    let reader = Cursor::new("beach\n");
    let mut interface = CliInterface::new(reader);

    // Must terminate once input runs out
    game_loop(&mut game, &mut interface).await;

    assert_eq!(game.state().status, GameStatus::InProgress);
    assert_eq!(game.state().guesses.len(), 1);
}

#[tokio::test]
async fn test_cli_rejects_wrong_length_without_spending_attempts() {
    let mut game = letter_game(single_word_catalog("CLOUD", "Water in the sky"));
    let reader = Cursor::new("sky\nthunder\n\nexit\n");
    let mut interface = CliInterface::new(reader);

    game_loop(&mut game, &mut interface).await;

    assert!(game.state().guesses.is_empty());
    assert_eq!(game.state().attempts_remaining, 6);
}

#[tokio::test]
async fn test_loop_reports_session_clues() {
    let mut game = letter_game(single_word_catalog("DANCE", "Move rhythmically to music"));
    let mut interface = RecordingInterface::with_actions(vec![UserAction::Exit]);

    game_loop(&mut game, &mut interface).await;

    assert_eq!(
        interface.sessions,
        vec![(5, 'D', "Move rhythmically to music".to_string())]
    );
    assert!(interface.exited);
}

#[tokio::test]
async fn test_loop_loss_reveals_word_and_blocks_further_guesses() {
    let mut game = letter_game(single_word_catalog("EAGLE", "A bird of prey"));
    let mut actions: Vec<UserAction> = (0..6).map(|_| guess("BEACH")).collect();
    actions.push(guess("EAGLE"));
    let mut interface = RecordingInterface::with_actions(actions);

    game_loop(&mut game, &mut interface).await;

    assert_eq!(interface.losses, vec!["EAGLE".to_string()]);
    assert_eq!(interface.wins, 0);
    assert_eq!(interface.rejections, vec![GuessError::GameAlreadyOver]);
    assert_eq!(interface.states.len(), 6);
    assert_eq!(game.state().status, GameStatus::Lost);
}

#[tokio::test]
async fn test_loop_rejections_are_reported() {
    let mut game = letter_game(single_word_catalog("EAGLE", "A bird of prey"));
    let mut interface =
        RecordingInterface::with_actions(vec![guess("   "), guess("HAWK"), guess("EAGLE")]);

    game_loop(&mut game, &mut interface).await;

    assert_eq!(
        interface.rejections,
        vec![
            GuessError::EmptyGuess,
            GuessError::LengthMismatch {
                expected: 5,
                actual: 4
            }
        ]
    );
    assert_eq!(interface.wins, 1);
}

#[tokio::test]
async fn test_loop_padded_guess_counts_raw_length() {
    let mut game = letter_game(single_word_catalog("APPLE", "A fruit"));
    let mut interface = RecordingInterface::with_actions(vec![guess(" apple ")]);

    game_loop(&mut game, &mut interface).await;

    assert_eq!(
        interface.rejections,
        vec![GuessError::LengthMismatch {
            expected: 5,
            actual: 7
        }]
    );
    assert_eq!(interface.wins, 0);
    assert!(game.state().guesses.is_empty());
    assert_eq!(game.state().attempts_remaining, 6);
}

#[tokio::test]
async fn test_loop_new_game_after_win() {
    let catalog = Arc::new(Catalog::embedded().unwrap());
    let mut game = letter_game(Arc::clone(&catalog));
    let first_target = game.state().target.word.clone();
    let mut interface =
        RecordingInterface::with_actions(vec![guess(&first_target), UserAction::NewGame]);

    game_loop(&mut game, &mut interface).await;

    assert_eq!(interface.wins, 1);
    assert_eq!(interface.new_games, 1);
    assert_eq!(interface.sessions.len(), 2);
    assert_eq!(game.state().status, GameStatus::InProgress);
    assert!(game.state().guesses.is_empty());
    assert_eq!(game.state().attempts_remaining, 6);
}

#[tokio::test]
async fn test_proximity_session_reports_evaluation_and_scores() {
    let scorer = ScriptedScorer::new(vec![Some(40), None, Some(85)]);
    let mut game = proximity_game(single_word_catalog("APPLE", "A fruit"), scorer.clone());
    let mut interface = RecordingInterface::with_actions(vec![
        guess("grape"),
        guess("beach"),
        guess("amble"),
        guess("apple"),
    ]);

    game_loop(&mut game, &mut interface).await;

    assert_eq!(interface.evaluating, vec!["GRAPE", "BEACH", "AMBLE"]);
    assert_eq!(scorer.calls(), 3);
    let scores: Vec<Feedback> = game
        .state()
        .guesses
        .iter()
        .map(|g| g.feedback.clone())
        .collect();
    assert_eq!(
        scores,
        vec![
            Feedback::Proximity(40),
            Feedback::Proximity(0),
            Feedback::Proximity(85),
            Feedback::Proximity(100),
        ]
    );
    assert_eq!(interface.wins, 1);
    assert_eq!(game.state().attempts_remaining, 3);
}

#[tokio::test]
async fn test_letter_session_never_shows_evaluating() {
    let mut game = letter_game(single_word_catalog("APPLE", "A fruit"));
    let mut interface = RecordingInterface::with_actions(vec![guess("EAGLE")]);

    game_loop(&mut game, &mut interface).await;

    assert!(interface.evaluating.is_empty());
    assert_eq!(
        game.state().guesses[0].feedback,
        Feedback::Letters(vec![
            LetterTag::Present,
            LetterTag::Present,
            LetterTag::Absent,
            LetterTag::Exact,
            LetterTag::Exact,
        ])
    );
}

#[tokio::test]
async fn test_winning_first_guess_makes_no_remote_call() {
    let scorer = ScriptedScorer::new(Vec::new());
    let mut game = proximity_game(single_word_catalog("BEACH", "A shore"), scorer.clone());

    let outcome = game.submit_guess("Beach").await.unwrap();

    assert_eq!(outcome, GuessOutcome::Win { attempts_used: 1 });
    assert_eq!(scorer.calls(), 0);
}

#[tokio::test]
async fn test_unreachable_scorer_keeps_game_playable() {
    let scorer = ScriptedScorer::new(Vec::new());
    let mut game = proximity_game(single_word_catalog("BEACH", "A shore"), scorer.clone());

    for _ in 0..6 {
        game.submit_guess("CLOUD").await.unwrap();
    }

    assert_eq!(game.state().status, GameStatus::Lost);
    assert!(
        game.state()
            .guesses
            .iter()
            .all(|g| g.feedback == Feedback::Proximity(0))
    );
    assert_eq!(scorer.calls(), 6);
}

#[tokio::test]
async fn test_custom_catalog_file_to_game() {
    use std::fs::File;
    use std::io::Write;

    let path = std::env::temp_dir().join("word_guess_test_catalog.txt");
    {
        let mut file = File::create(&path).unwrap();
        writeln!(file, "# test catalog").unwrap();
        writeln!(file, "melon|A large sweet fruit").unwrap();
    }

    let catalog = load_catalog_from_file(&path).unwrap();
    assert_eq!(catalog.len(), 1);
    let mut game = letter_game(Arc::new(catalog));
    assert_eq!(game.hint().definition, "A large sweet fruit");

    let reader = Cursor::new("lemon\nmelon\n");
    let mut interface = CliInterface::new(reader);
    game_loop(&mut game, &mut interface).await;
    assert_eq!(game.state().status, GameStatus::Won);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_malformed_catalog_refuses_to_start() {
    let err = load_catalog_from_str("APPLE|A fruit\nBEACH|\n").unwrap_err();
    assert!(matches!(err, CatalogError::EmptyDefinition { index: 1, .. }));
}

#[test]
fn test_build_strategy_selects_kind() {
    let letter = build_strategy(StrategyKind::LetterMatch, ScoringConfig::default());
    assert_eq!(letter.kind(), StrategyKind::LetterMatch);
    let proximity = build_strategy(StrategyKind::Proximity, ScoringConfig::default());
    assert_eq!(proximity.kind(), StrategyKind::Proximity);
    assert_eq!(proximity.exact_match(5), Feedback::Proximity(100));
}

#[tokio::test]
async fn test_proximity_without_api_key_scores_zero() {
    let strategy = build_strategy(StrategyKind::Proximity, ScoringConfig::default());
    assert_eq!(
        strategy.evaluate("BEACH", "APPLE").await,
        Feedback::Proximity(0)
    );
}
