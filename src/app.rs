use crate::leaderboard::{MatchRecord, ScoreStore, TOP_SCORES};
use crate::session::GameSession;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Characters the input line holds
pub const MAX_INPUT_CHARS: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Terminal front-end state around one game session
pub struct App<S: ScoreStore> {
    pub session: GameSession,
    pub state: AppState,
    pub input: String,
    pub top_scores: Vec<MatchRecord>,
    pub board_warning: Option<String>,
    store: S,
}

impl<S: ScoreStore> App<S> {
    pub fn new(session: GameSession, store: S) -> Self {
        Self {
            session,
            state: AppState::Playing,
            input: String::new(),
            top_scores: Vec::new(),
            board_warning: None,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn on_tick(&mut self, delta_secs: f64) {
        if self.state != AppState::Playing {
            return;
        }
        if self.session.on_tick(delta_secs).is_terminal() {
            self.finish_match();
        }
    }

    /// Record the result and read the board once, outside the frame path
    fn finish_match(&mut self) {
        self.session.save_result(&self.store);
        match self.store.top_n(TOP_SCORES) {
            Ok(top) => {
                self.top_scores = top;
                self.board_warning = None;
            }
            Err(e) => {
                log::warn!("could not read scoreboard: {e}");
                self.top_scores.clear();
                self.board_warning = Some(format!("scoreboard unavailable: {e}"));
            }
        }
        self.input.clear();
        self.state = AppState::GameOver;
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.input.clear();
        self.top_scores.clear();
        self.board_warning = None;
        self.state = AppState::Playing;
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Control::Quit;
        }

        match self.state {
            AppState::Playing => match key.code {
                KeyCode::Enter => {
                    let typed = std::mem::take(&mut self.input);
                    self.session.submit(&typed);
                    if self.session.status().is_terminal() {
                        self.finish_match();
                    }
                }
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) if !c.is_whitespace() && !c.is_control() => {
                    if self.input.chars().count() < MAX_INPUT_CHARS {
                        self.input.push(c);
                    }
                }
                _ => {}
            },
            AppState::GameOver => match key.code {
                // not Enter: it may still be repeating from the last word
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('q') => return Control::Quit,
                _ => {}
            },
        }
        Control::Continue
    }
}
