use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::estimator::{estimate, EstimateResult};
use crate::results::NewResult;
use crate::sampler::Question;

/// Ticks to wait after an answer before moving to the next question
pub const ADVANCE_DELAY_TICKS: u8 = 2;

/// Selected option per question position; unanswered positions are absent
pub type AnswerRecord = BTreeMap<usize, usize>;

/// Aggregate performance of a finished quiz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizSummary {
    pub total: usize,
    pub correct: usize,
    /// Mean difficulty over all questions, unrounded
    pub avg_difficulty: f64,
    pub age: Option<u32>,
}

impl QuizSummary {
    /// Aggregate a question set against the answers given
    pub fn from_answers(questions: &[Question], answers: &AnswerRecord, age: Option<u32>) -> Self {
        let total = questions.len();
        let correct = questions
            .iter()
            .enumerate()
            .filter(|(i, q)| answers.get(i).is_some_and(|&a| q.is_correct(a)))
            .count();
        let sum: f64 = questions.iter().map(|q| f64::from(q.difficulty)).sum();

        Self {
            total,
            correct,
            avg_difficulty: sum / total.max(1) as f64,
            age,
        }
    }

    /// Average difficulty at the two-decimal precision it is stored with
    pub fn avg_difficulty_rounded(&self) -> f64 {
        (self.avg_difficulty * 100.0).round() / 100.0
    }

    pub fn estimate(&self) -> EstimateResult {
        estimate(
            self.total as i64,
            self.correct as i64,
            self.avg_difficulty,
            self.age,
        )
    }

    /// The fields handed to the result store
    pub fn new_result(&self, est: &EstimateResult) -> NewResult {
        NewResult {
            total: self.total as i64,
            correct: self.correct as i64,
            avg_difficulty: self.avg_difficulty_rounded(),
            est_mean: est.mean,
            est_lo: est.lo,
            est_hi: est.hi,
        }
    }
}

/// A quiz being taken: the questions, answers so far and the current position
#[derive(Debug, Clone)]
pub struct Quiz {
    pub questions: Vec<Question>,
    pub answers: AnswerRecord,
    pub position: usize,
    pub age: Option<u32>,
    /// Ticks left before the pending automatic advance, if one is scheduled
    pub advance_in: Option<u8>,
    pub finished: bool,
}

impl Quiz {
    pub fn new(questions: Vec<Question>, age: Option<u32>) -> Self {
        info!(questions = questions.len(), ?age, "quiz started");
        Self {
            questions,
            answers: AnswerRecord::new(),
            position: 0,
            age,
            advance_in: None,
            finished: false,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    pub fn answer_at(&self, position: usize) -> Option<usize> {
        self.answers.get(&position).copied()
    }

    pub fn is_answered(&self, position: usize) -> bool {
        self.answers.contains_key(&position)
    }

    pub fn is_correct(&self, position: usize) -> bool {
        match (self.questions.get(position), self.answer_at(position)) {
            (Some(q), Some(a)) => q.is_correct(a),
            _ => false,
        }
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Share of the quiz before the current question, in percent
    pub fn progress_percent(&self) -> u16 {
        if self.is_empty() {
            return 0;
        }
        ((self.position as f64 / self.len() as f64) * 100.0).round() as u16
    }

    /// Record an answer for the current question.
    ///
    /// Answered questions are locked, and options outside the question are
    /// ignored. Returns whether the answer was recorded.
    pub fn answer(&mut self, option: usize) -> bool {
        if self.finished || self.is_answered(self.position) {
            return false;
        }
        let Some(question) = self.current() else {
            return false;
        };
        if option >= question.options.len() {
            return false;
        }

        debug!(
            position = self.position,
            word = %question.word,
            correct = question.is_correct(option),
            "answered"
        );
        self.answers.insert(self.position, option);
        self.advance_in = Some(ADVANCE_DELAY_TICKS);
        true
    }

    /// Count down a pending automatic advance. Returns true when it moved
    /// to another question.
    pub fn on_tick(&mut self) -> bool {
        match self.advance_in {
            Some(n) if n <= 1 => {
                let before = self.position;
                self.next();
                self.position != before
            }
            Some(n) => {
                self.advance_in = Some(n - 1);
                false
            }
            None => false,
        }
    }

    pub fn advance_pending(&self) -> bool {
        self.advance_in.is_some()
    }

    pub fn next(&mut self) {
        self.advance_in = None;
        if self.position + 1 < self.len() {
            self.position += 1;
        }
    }

    pub fn previous(&mut self) {
        self.advance_in = None;
        self.position = self.position.saturating_sub(1);
    }

    pub fn go_to(&mut self, position: usize) {
        self.advance_in = None;
        self.position = position.min(self.len().saturating_sub(1));
    }

    /// Close the quiz and aggregate the answers
    pub fn finish(&mut self) -> QuizSummary {
        self.finished = true;
        self.advance_in = None;
        let summary = self.summary();
        info!(
            total = summary.total,
            correct = summary.correct,
            avg_difficulty = summary.avg_difficulty,
            "quiz finished"
        );
        summary
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary::from_answers(&self.questions, &self.answers, self.age)
    }
}
