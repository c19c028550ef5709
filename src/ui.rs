pub mod charting;
pub mod history;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppState, QuizOutcome};
use crate::quiz::Quiz;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Draw the screen for the app's current state
pub fn ui(app: &App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn render_notice(app: &App, area: Rect, buf: &mut Buffer) {
    if let Some(notice) = &app.notice {
        Paragraph::new(Span::styled(
            notice.as_str(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
    }
}

fn render_quiz(quiz: &Quiz, area: Rect, buf: &mut Buffer) {
    let Some(question) = quiz.current() else {
        Paragraph::new("No questions available in this word bank.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .render(area, buf);
        return;
    };

    let option_rows = question.options.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),           // progress
            Constraint::Length(1),           // padding
            Constraint::Length(1),           // question number
            Constraint::Length(2),           // prompt
            Constraint::Length(option_rows), // options
            Constraint::Min(0),
            Constraint::Length(1), // answered count
        ])
        .split(area);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(quiz.progress_percent().min(100))
        .label("")
        .render(chunks[0], buf);

    Paragraph::new(Line::from(vec![
        Span::styled(
            format!("Question {} / {}", quiz.position + 1, quiz.len()),
            bold(),
        ),
        Span::styled(
            format!("  (difficulty {})", question.difficulty),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(question.prompt.as_str(), bold()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    // center a column as wide as the longest option
    let label_width = 4;
    let widest = question
        .options
        .iter()
        .map(|o| o.width())
        .max()
        .unwrap_or_default() as u16
        + label_width;
    let column = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(widest.min(chunks[4].width)),
            Constraint::Min(0),
        ])
        .split(chunks[4])[1];

    let chosen = quiz.answer_at(quiz.position);
    let lines: Vec<Line> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = match chosen {
                None => Style::default(),
                Some(_) if question.is_correct(i) => bold().fg(Color::Green),
                Some(c) if c == i => bold().fg(Color::Red),
                Some(_) => Style::default().add_modifier(Modifier::DIM),
            };
            Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::Cyan)),
                Span::styled(option.as_str(), style),
            ])
        })
        .collect();
    Paragraph::new(lines).render(column, buf);

    Paragraph::new(Span::styled(
        format!("Answered: {} / {}", quiz.answered_count(), quiz.len()),
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[6], buf);
}

fn render_results(outcome: &QuizOutcome, area: Rect, buf: &mut Buffer) {
    let summary = &outcome.summary;
    let est = &outcome.estimate;

    let lines = vec![
        Line::from(Span::styled(
            "Your result",
            bold().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Correct answers: "),
            Span::styled(format!("{} / {}", summary.correct, summary.total), bold()),
            Span::raw(format!("  ({}%)", est.accuracy)),
        ]),
        Line::from(format!(
            "Average difficulty: {:.2}",
            summary.avg_difficulty_rounded()
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Estimated vocabulary: "),
            Span::styled(
                format!("{} – {} words", est.lo, est.hi),
                bold().fg(Color::Green),
            ),
        ]),
        Line::from(Span::styled(
            format!("(midpoint ~{})", est.mean),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(1),    // body
                Constraint::Length(1), // notice
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ])
            .split(area);

        let legend = match (self.state, &self.outcome) {
            (AppState::Results, Some(outcome)) => {
                render_results(outcome, chunks[0], buf);
                "(r)etry / (h)istory / (esc)ape"
            }
            _ => {
                render_quiz(&self.quiz, chunks[0], buf);
                if self.quiz.is_last() {
                    "(1-9) answer / (←/→) move / (enter) finish / (h)istory / (esc)ape"
                } else {
                    "(1-9) answer / (←/→) move / (h)istory / (esc)ape"
                }
            }
        };

        render_notice(self, chunks[1], buf);
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[3], buf);
    }
}
