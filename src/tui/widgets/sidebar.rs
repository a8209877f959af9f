use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{score_color, truncate};
use crate::models::Mode;
use crate::view::{Body, HistoryEntry, QuestionView, ViewModel};

pub fn draw(f: &mut Frame, vm: &ViewModel, area: Rect) {
    match &vm.body {
        Body::InProgress(q) if q.mode == Mode::Learning => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(5), // Learning controls
                    Constraint::Min(0),    // History
                ])
                .split(area);
            draw_controls(f, q, chunks[0]);
            draw_history(f, &vm.history, chunks[1]);
        }
        _ => draw_history(f, &vm.history, area),
    }
}

fn availability(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_controls(f: &mut Frame, q: &QuestionView, area: Rect) {
    let text = vec![
        Line::from(vec![
            Span::styled("Show answer: ", Style::default().fg(Color::Gray)),
            Span::styled(
                if q.show_answer { "on" } else { "off" },
                Style::default().fg(if q.show_answer { Color::Green } else { Color::White }),
            ),
        ]),
        Line::from(vec![
            Span::styled("< Previous", availability(q.can_go_previous)),
            Span::raw("   "),
            Span::styled("Next >", availability(q.can_go_next)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Test Controls ")
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_history(f: &mut Frame, history: &[HistoryEntry], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Test History ")
        .title_style(Style::default().fg(Color::Magenta));

    if history.is_empty() {
        let paragraph = Paragraph::new("No test history yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    // Newest first
    let items: Vec<ListItem> = history
        .iter()
        .rev()
        .map(|entry| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    truncate(&entry.test_name, 28),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::styled(format!("{:<9}", entry.mode.as_str()), Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!("{:.1}%", entry.score),
                        Style::default().fg(score_color(entry.score)),
                    ),
                ]),
                Line::from(Span::styled(entry.date.clone(), Style::default().fg(Color::DarkGray))),
            ])
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
