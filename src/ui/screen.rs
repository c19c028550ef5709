use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;

use crate::app::{App, AppState};
use crate::ui::history::render_history;

/// A UI Screen boundary: responsible for rendering and optional key handling
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
    /// Optional per-screen key handling. Returns true if the key was handled.
    fn on_key(&mut self, _key: KeyEvent, _app: &mut App) -> bool {
        false
    }
}

/// Question screen - renders the quiz using the App widget
pub struct QuizScreen;

impl Screen for QuizScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }

    fn on_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let option = c as usize - '1' as usize;
                app.quiz.answer(option)
            }
            KeyCode::Left => {
                app.quiz.previous();
                true
            }
            KeyCode::Right => {
                app.quiz.next();
                true
            }
            KeyCode::Enter if app.quiz.is_last() => {
                app.finish_quiz();
                true
            }
            KeyCode::Enter => {
                app.quiz.next();
                true
            }
            KeyCode::Char('h') => {
                app.show_history();
                true
            }
            _ => false,
        }
    }
}

/// Results screen - renders the estimate using the App widget
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }

    fn on_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('n') => {
                app.new_quiz();
                true
            }
            KeyCode::Char('h') => {
                app.show_history();
                true
            }
            _ => false,
        }
    }
}

/// History screen - chart and table of stored results
pub struct HistoryScreen;

impl Screen for HistoryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_history(app, f);
    }

    fn on_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        match key.code {
            KeyCode::Char('b') | KeyCode::Backspace => {
                app.close_history();
                true
            }
            KeyCode::Char('n') => {
                app.new_quiz();
                true
            }
            KeyCode::Up => {
                app.history_scroll = app.history_scroll.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                // clamped against the visible rows when rendering
                app.history_scroll = (app.history_scroll + 1).min(app.history.len().saturating_sub(1));
                true
            }
            KeyCode::Home => {
                app.history_scroll = 0;
                true
            }
            _ => false,
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Quiz => Box::new(QuizScreen),
        AppState::Results => Box::new(ResultsScreen),
        AppState::History => Box::new(HistoryScreen),
    }
}
