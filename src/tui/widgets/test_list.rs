use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::truncate;
use crate::view::TestSummary;

pub fn draw(f: &mut Frame, summaries: &[TestSummary], selected: Option<usize>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Available Tests ")
        .title_style(Style::default().fg(Color::Cyan));

    if summaries.is_empty() {
        let paragraph = Paragraph::new("No tests found. Add <TestName>.json files to the questions directory.")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = summaries
        .iter()
        .map(|test| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<40}", truncate(&test.name, 38)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{} questions", test.question_count),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(selected);
    f.render_stateful_widget(list, area, &mut state);
}
