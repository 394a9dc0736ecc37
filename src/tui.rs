//! TUI (Terminal User Interface) module for the word guessing game
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # State Machine
//! - `EnteringGuess` → `Evaluating` (proximity scoring only) → back to `EnteringGuess`
//! - `EnteringGuess` → `GameOver` on a win or loss; `N` starts a new game

use crate::feedback::{Feedback, LetterTag};
use crate::game_state::{GameInterface, GameState, GuessError, GuessRecord, Hint, UserAction};
use crate::wordbank::WordEntry;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;

const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

/// Background and foreground colors for a letter tile.
pub fn tile_colors(tag: Option<LetterTag>) -> (Color, Color) {
    match tag {
        None => (Color::DarkGray, Color::White),
        Some(LetterTag::Exact) => (Color::Green, Color::Black),
        Some(LetterTag::Present) => (Color::Yellow, Color::Black),
        Some(LetterTag::Absent) => (Color::Gray, Color::White),
    }
}

/// Color for a proximity score, from cold to hot.
pub fn proximity_color(score: u8) -> Color {
    match score {
        0..=24 => Color::Blue,
        25..=49 => Color::Cyan,
        50..=74 => Color::Yellow,
        75..=99 => Color::LightRed,
        _ => Color::Green,
    }
}

/// Appends the uppercase form of `c` unless that would push the input past `max` characters.
fn push_guess_char(input: &mut String, c: char, max: usize) -> bool {
    let upper: String = c.to_uppercase().collect();
    if input.chars().count() + upper.chars().count() > max {
        return false;
    }
    input.push_str(&upper);
    true
}

fn message_style(solved: bool) -> Style {
    if solved { SUCCESS_STYLE } else { MESSAGE_STYLE }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    EnteringGuess,
    Evaluating,
    GameOver,
}

/// Clues for the current session, copied out of the engine.
#[derive(Debug, Default)]
struct Clues {
    length: usize,
    first_letter: char,
    definition: String,
}

struct RenderContext<'a> {
    clues: &'a Clues,
    guesses: &'a [GuessRecord],
    max_rows: usize,
    attempts_remaining: u32,
    current_input: &'a str,
    state: TuiState,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
    solved: bool,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    clues: Clues,
    guesses: Vec<GuessRecord>,
    max_rows: usize,
    attempts_remaining: u32,
    current_input: String,
    state: TuiState,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal backend created");

        Ok(Self {
            terminal,
            clues: Clues::default(),
            guesses: Vec::new(),
            max_rows: 0,
            attempts_remaining: 0,
            current_input: String::new(),
            state: TuiState::EnteringGuess,
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            clues: &self.clues,
            guesses: &self.guesses,
            max_rows: self.max_rows,
            attempts_remaining: self.attempts_remaining,
            current_input: &self.current_input,
            state: self.state,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
            solved: self.guesses.last().is_some_and(|g| g.feedback.is_exact()),
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(6), // Clues
                Constraint::Min(8),    // Board
                Constraint::Length(4), // Messages
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_clues(f, chunks[1], ctx.clues, ctx.attempts_remaining);
        Self::render_board(f, chunks[2], ctx);
        Self::render_messages(f, chunks[3], ctx);
        Self::render_status(f, chunks[4], ctx.status);
        Self::render_instructions(f, chunks[5], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("WORD GUESS")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_clues(f: &mut Frame, area: Rect, clues: &Clues, attempts_remaining: u32) {
        let lines = vec![
            Line::from(format!("Word length: {}", clues.length)),
            Line::from(format!("First letter: {}", clues.first_letter)),
            Line::from(format!("Definition: {}", clues.definition)),
            Line::from(vec![Span::styled(
                format!("Attempts remaining: {attempts_remaining}"),
                INFO_STYLE,
            )]),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Clues").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default()
            .title("Guesses")
            .borders(Borders::ALL)
            .style(Style::default());

        let inner = block.inner(area);
        f.render_widget(block, area);

        let available_rows = (inner.height / ROW_SPACING) as usize;
        let showing_input =
            ctx.state == TuiState::EnteringGuess && ctx.guesses.len() < ctx.max_rows;
        let rows_needed = ctx.guesses.len() + usize::from(showing_input);

        // Keep the most recent guesses visible when the board is short.
        let skip_count = rows_needed.saturating_sub(available_rows);

        for (display_index, guess) in ctx.guesses.iter().skip(skip_count).enumerate() {
            Self::render_guess_row(f, guess, display_index, inner);
        }

        if showing_input {
            let display_row = ctx.guesses.len() - skip_count;
            Self::render_current_input(f, display_row, inner, ctx.current_input, ctx.clues.length);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_guess_row(f: &mut Frame, guess: &GuessRecord, row_index: usize, area: Rect) {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }

        let mut spans = vec![Span::raw("  ")];
        match &guess.feedback {
            Feedback::Letters(tags) => {
                for (letter, tag) in guess.word.chars().zip(tags) {
                    let (bg_color, fg_color) = tile_colors(Some(*tag));
                    spans.push(Span::styled(
                        format!(" {letter} "),
                        Style::default().fg(fg_color).bg(bg_color),
                    ));
                    spans.push(Span::raw(" "));
                }
            }
            Feedback::Proximity(score) => {
                let (bg_color, fg_color) = tile_colors(None);
                for letter in guess.word.chars() {
                    spans.push(Span::styled(
                        format!(" {letter} "),
                        Style::default().fg(fg_color).bg(bg_color),
                    ));
                    spans.push(Span::raw(" "));
                }
                spans.push(Span::styled(
                    format!("  {score}% proximity"),
                    Style::default()
                        .fg(proximity_color(*score))
                        .add_modifier(Modifier::BOLD),
                ));
            }
        }

        Self::render_line(f, area, y, spans);
    }

    fn render_line(f: &mut Frame, area: Rect, y: u16, spans: Vec<Span>) {
        let line = Line::from(spans);
        let paragraph = Paragraph::new(line);
        f.render_widget(
            paragraph,
            Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            },
        );
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_current_input(
        f: &mut Frame,
        row_index: usize,
        area: Rect,
        current_input: &str,
        length: usize,
    ) {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }

        let mut spans = vec![Span::raw("  ")];
        let mut letters = current_input.chars();
        for _ in 0..length {
            let letter = letters.next().unwrap_or(' ');
            spans.push(Span::styled(
                format!(" {letter} "),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ));
            spans.push(Span::raw(" "));
        }

        Self::render_line(f, area, y, spans);
    }

    fn render_messages(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();
        if !ctx.message.is_empty() {
            lines.push(Line::from(vec![Span::styled(
                ctx.message,
                message_style(ctx.solved),
            )]));
        }
        if !ctx.error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.error_message, ERROR_STYLE)]));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Messages").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::EnteringGuess => "Type your guess | ENTER: Submit | ESC: Quit",
            TuiState::Evaluating => "Evaluating your guess...",
            TuiState::GameOver => "N: New Game | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let key = match event::read()? {
            Event::Key(key) => key,
            other => {
                debug_log!("handle_input() - Ignoring non-key event: {:?}", other);
                return Ok(None);
            }
        };

        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }

        // Garbage from escape sequences when the terminal regains focus
        if let KeyCode::Char(c) = key.code
            && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
        {
            debug_log!("handle_input() - Ignoring invalid character: {:?}", c);
            return Ok(None);
        }

        match self.state {
            TuiState::EnteringGuess => Ok(self.handle_guess_input(key)),
            TuiState::GameOver => Ok(Self::handle_game_over_input(key)),
            // No submissions while a guess is being scored
            TuiState::Evaluating => Ok(None),
        }
    }

    fn handle_guess_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();

        match key.code {
            KeyCode::Char(c) if c.is_alphabetic() => {
                if Self::has_modifier_keys(&key) {
                    debug_log!(
                        "handle_guess_input() - Ignoring character with modifier: {:?}",
                        key.modifiers
                    );
                } else if !push_guess_char(&mut self.current_input, c, self.clues.length) {
                    debug_log!("handle_guess_input() - Input full, ignoring '{}'", c);
                }
            }
            KeyCode::Backspace => {
                self.current_input.pop();
            }
            KeyCode::Enter => {
                // Length is checked by the engine so the rejection message is uniform.
                let guess = std::mem::take(&mut self.current_input);
                info_log!("handle_guess_input() - Submitting '{}'", guess);
                return Some(UserAction::Guess(guess));
            }
            KeyCode::Esc => return Some(UserAction::Exit),
            KeyCode::Char(c) if !c.is_alphabetic() => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
            }
            _ => {}
        }
        None
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(event::KeyModifiers::ALT)
            || key.modifiers.contains(event::KeyModifiers::CONTROL)
    }

    fn handle_game_over_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('n' | 'N') => Some(UserAction::NewGame),
            KeyCode::Esc => Some(UserAction::Exit),
            _ => None,
        }
    }

    fn sync_state(&mut self, state: &GameState) {
        self.guesses.clone_from(&state.guesses);
        self.attempts_remaining = state.attempts_remaining;
    }
}

impl GameInterface for TuiInterface {
    fn display_session_start(&mut self, hint: &Hint<'_>, state: &GameState) {
        self.clues = Clues {
            length: hint.length,
            first_letter: hint.first_letter,
            definition: hint.definition.to_string(),
        };
        self.sync_state(state);
        self.max_rows = state.guesses.len() + state.attempts_remaining as usize;
        self.current_input.clear();
        self.error_message.clear();
        self.state = TuiState::EnteringGuess;
        self.status = format!("Find the {}-letter word", hint.length);
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }
            match self.handle_input() {
                Ok(Some(action)) => return Some(action),
                Ok(None) => {}
                Err(_e) => {
                    info_log!("read_action() - Error handling input, returning Exit");
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_evaluating(&mut self, guess: &str) {
        self.state = TuiState::Evaluating;
        self.status = format!("Evaluating {guess}...");
        self.draw_or_log();
    }

    fn display_state(&mut self, state: &GameState) {
        self.sync_state(state);
        if !state.is_over() {
            self.state = TuiState::EnteringGuess;
            self.status = "Enter your next guess".to_string();
        }
        self.draw_or_log();
    }

    fn display_rejection(&mut self, error: &GuessError) {
        self.error_message = error.to_string();
        self.draw_or_log();
    }

    fn display_win(&mut self, state: &GameState) {
        self.state = TuiState::GameOver;
        self.message = format!(
            "✓ Congratulations! You found {} in {} attempts.",
            state.target.word,
            state.guesses.len()
        );
        self.status = format!("Game Over - Solution: {}", state.target.word);
        self.draw_or_log();
    }

    fn display_loss(&mut self, revealed: &WordEntry) {
        self.state = TuiState::GameOver;
        self.message = format!("Game over! The word was {}.", revealed.word);
        self.status = format!("Game Over - Solution: {}", revealed.word);
        self.draw_or_log();
    }

    fn display_new_game_message(&mut self) {
        self.message = "New game started.".to_string();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
