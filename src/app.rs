use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::bank::WordBank;
use crate::config::Config;
use crate::estimator::EstimateResult;
use crate::quiz::{Quiz, QuizSummary};
use crate::results::{ResultRecord, ResultStore};
use crate::sampler::sample;
use crate::ui::screen::current_screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Quiz,
    Results,
    History,
}

/// What came out of the last finished quiz
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub summary: QuizSummary,
    pub estimate: EstimateResult,
    /// The stored record, absent when there is no store or saving failed
    pub saved: Option<ResultRecord>,
}

pub struct App {
    pub settings: Config,
    pub bank: WordBank,
    pub quiz: Quiz,
    pub state: AppState,
    pub outcome: Option<QuizOutcome>,
    pub history: Vec<ResultRecord>,
    pub history_scroll: usize,
    /// One-line message shown under the current screen
    pub notice: Option<String>,
    pub should_quit: bool,
    store: Option<Box<dyn ResultStore>>,
}

impl App {
    pub fn new(settings: Config, bank: WordBank, store: Option<Box<dyn ResultStore>>) -> Self {
        let mut app = Self {
            quiz: Quiz::new(Vec::new(), settings.age),
            settings,
            bank,
            state: AppState::Quiz,
            outcome: None,
            history: Vec::new(),
            history_scroll: 0,
            notice: None,
            should_quit: false,
            store,
        };
        app.new_quiz();
        app
    }

    /// Sample a fresh quiz with the current settings
    pub fn new_quiz(&mut self) {
        let requested = self.settings.number_of_questions;
        let questions = sample(&self.bank, requested, self.settings.mix);
        self.notice = if questions.len() < requested {
            Some(format!(
                "Only {} distinct words available, quiz shortened from {}",
                questions.len(),
                requested
            ))
        } else {
            None
        };
        self.quiz = Quiz::new(questions, self.settings.age);
        self.state = AppState::Quiz;
    }

    /// Score the quiz, estimate, and store the result
    pub fn finish_quiz(&mut self) {
        let summary = self.quiz.finish();
        let estimate = summary.estimate();
        let new_result = summary.new_result(&estimate);

        let saved = match self.store.as_mut() {
            Some(store) => match store.create(&self.settings.user, &new_result) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "failed to save quiz result");
                    self.notice = Some(format!("Result not saved: {e}"));
                    None
                }
            },
            None => None,
        };

        if let Some(record) = &saved {
            self.history.push(record.clone());
        }
        self.outcome = Some(QuizOutcome {
            summary,
            estimate,
            saved,
        });
        self.state = AppState::Results;
    }

    /// Reload the user's results and switch to the history screen
    pub fn show_history(&mut self) {
        if let Some(store) = self.store.as_ref() {
            match store.list_for_user(&self.settings.user) {
                Ok(records) => self.history = records,
                Err(e) => {
                    warn!(error = %e, "failed to load history");
                    self.notice = Some(format!("History unavailable: {e}"));
                }
            }
        }
        self.history_scroll = 0;
        self.state = AppState::History;
    }

    /// Leave the history screen for where the user came from
    pub fn close_history(&mut self) {
        self.state = if self.outcome.is_some() && self.quiz.finished {
            AppState::Results
        } else {
            AppState::Quiz
        };
    }

    /// Whether the quiz is waiting to move on by itself
    pub fn advance_pending(&self) -> bool {
        self.state == AppState::Quiz && self.quiz.advance_pending()
    }

    /// Returns true when the screen changed
    pub fn on_tick(&mut self) -> bool {
        self.state == AppState::Quiz && self.quiz.on_tick()
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        let mut screen = current_screen(&self.state);
        screen.on_key(key, self);
    }
}
