use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Wrap},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::app::App;
use crate::results::ResultRecord;
use crate::ui::charting::{compute_chart_params, format_label, history_points};

/// "3 days ago" style age of a result
pub fn humanize_age(created_at: DateTime<Local>, now: DateTime<Local>) -> String {
    let elapsed = (now - created_at).to_std().unwrap_or_default();
    if elapsed.as_secs() < 60 {
        return "just now".to_string();
    }
    HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
}

/// Pure presenter for one history table row
pub fn present_row(record: &ResultRecord, now: DateTime<Local>) -> Row<'static> {
    let accuracy = record.accuracy_percent();
    let accuracy_color = if accuracy >= 80 {
        Color::Green
    } else if accuracy >= 50 {
        Color::Yellow
    } else {
        Color::Red
    };

    Row::new(vec![
        Cell::from(record.created_at.format("%Y-%m-%d %H:%M").to_string()),
        Cell::from(humanize_age(record.created_at, now))
            .style(Style::default().add_modifier(Modifier::DIM)),
        Cell::from(format!(
            "{}/{} ({}%)",
            record.correct, record.total, accuracy
        ))
        .style(Style::default().fg(accuracy_color)),
        Cell::from(format!("{:.2}", record.avg_difficulty)),
        Cell::from(format!("{} – {}", record.est_lo, record.est_hi)),
        Cell::from(record.est_mean.to_string())
            .style(Style::default().add_modifier(Modifier::BOLD)),
    ])
}

pub fn render_history(app: &App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),      // Title
            Constraint::Percentage(50), // Chart
            Constraint::Min(4),         // Table
            Constraint::Length(1),      // Notice
            Constraint::Length(2),      // Instructions
        ])
        .split(area);

    let title = Paragraph::new(format!(
        "Progress for {} ({} results)",
        app.settings.user,
        app.history.len()
    ))
    .block(Block::default().borders(Borders::ALL).title("History"))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    if app.history.is_empty() {
        let no_data = Paragraph::new("No results yet. Finish a quiz and your progress shows up here.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    } else {
        let points = history_points(&app.history);
        let (x_bounds, y_bounds) = compute_chart_params(&points);
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let first_day = app.history[0].created_at.format("%Y-%m-%d").to_string();
        let last_day = app.history[app.history.len() - 1]
            .created_at
            .format("%Y-%m-%d")
            .to_string();

        let datasets = vec![Dataset::default()
            .name("estimated words")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&points)];

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("days")
                    .bounds(x_bounds)
                    .labels(vec![
                        Span::styled(first_day, bold_style),
                        Span::styled(last_day, bold_style),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("words")
                    .bounds(y_bounds)
                    .labels(vec![
                        Span::styled(format_label(y_bounds[0]), bold_style),
                        Span::styled(format_label(y_bounds[1]), bold_style),
                    ]),
            );
        f.render_widget(chart, chunks[1]);
    }

    // newest first
    let visible_height = chunks[2].height.saturating_sub(3) as usize;
    let max_scroll = app.history.len().saturating_sub(visible_height);
    let offset = app.history_scroll.min(max_scroll);
    let now = Local::now();
    let rows: Vec<Row> = app
        .history
        .iter()
        .rev()
        .skip(offset)
        .take(visible_height)
        .map(|r| present_row(r, now))
        .collect();

    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("When"),
        Cell::from("Score"),
        Cell::from("Avg diff"),
        Cell::from("Range"),
        Cell::from("Mean"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let widths = [
        Constraint::Length(16),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(9),
        Constraint::Length(16),
        Constraint::Min(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Results"))
        .column_spacing(2);
    f.render_widget(table, chunks[2]);

    if let Some(notice) = &app.notice {
        let notice = Paragraph::new(notice.as_str())
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        f.render_widget(notice, chunks[3]);
    }

    let instructions = Paragraph::new("(↑/↓) scroll  (Home) top  (b/backspace) back  (n) new quiz  (esc)ape")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .wrap(Wrap { trim: true });
    f.render_widget(instructions, chunks[4]);
}
