use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{score_color, truncate};
use crate::view::ResultView;

pub fn draw(f: &mut Frame, r: &ResultView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary
            Constraint::Min(0),    // Per-question breakdown
        ])
        .split(area);

    draw_summary(f, r, chunks[0]);
    draw_breakdown(f, r, chunks[1]);
}

fn draw_summary(f: &mut Frame, r: &ResultView, area: Rect) {
    let mut text = vec![
        Line::from(Span::styled(
            "Test Completed!",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Final Score: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:.1}%", r.score),
                Style::default()
                    .fg(score_color(r.score))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({}/{} correct, {} of {} answered)", r.correct, r.answered, r.answered, r.total),
                Style::default().fg(Color::Gray),
            ),
        ]),
    ];

    if let Some(fb) = &r.feedback {
        let (msg, color) = if fb.correct {
            (format!("Question {}: correct", fb.question_number), Color::Green)
        } else {
            (
                format!(
                    "Question {}: wrong, the correct answer was {}",
                    fb.question_number,
                    fb.correct_option.as_str()
                ),
                Color::Red,
            )
        };
        text.push(Line::from(Span::styled(msg, Style::default().fg(color))));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({}) ", r.test_name, r.mode.label()))
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_breakdown(f: &mut Frame, r: &ResultView, area: Rect) {
    let items: Vec<ListItem> = r
        .breakdown
        .iter()
        .map(|row| {
            let (mark, color) = if row.is_correct {
                ("Correct", Color::Green)
            } else {
                ("Wrong  ", Color::Red)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>3}. ", row.number), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<9}", mark), Style::default().fg(color)),
                Span::styled(
                    format!("you {} / answer {}  ", row.selected.as_str(), row.correct.as_str()),
                    Style::default().fg(Color::White),
                ),
                Span::styled(truncate(&row.question, 50), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Detailed Results ")
        .title_style(Style::default().fg(Color::Magenta));

    f.render_widget(List::new(items).block(block), area);
}
