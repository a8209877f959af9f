use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::score_color;
use crate::models::Mode;
use crate::view::{OptionView, QuestionView};

pub fn draw(f: &mut Frame, q: &QuestionView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Progress
            Constraint::Min(4),    // Question text
            Constraint::Length(7), // Options
            Constraint::Length(3), // Feedback
        ])
        .split(area);

    draw_progress(f, q, chunks[0]);
    draw_question(f, q, chunks[1]);
    draw_options(f, q, chunks[2]);
    draw_feedback(f, q, chunks[3]);
}

fn draw_progress(f: &mut Frame, q: &QuestionView, area: Rect) {
    let title = match q.current_score {
        Some(score) => format!(" {} | {} | Current Score: {:.1}% ", q.test_name, q.mode.label(), score),
        None => format!(" {} | {} ", q.test_name, q.mode.label()),
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(q.progress.clamp(0.0, 1.0))
        .label(format!("{}/{}", q.position, q.total));

    f.render_widget(gauge, area);
}

fn draw_question(f: &mut Frame, q: &QuestionView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Question {}/{} ", q.position, q.total))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let paragraph = Paragraph::new(q.text.as_str())
        .style(Style::default().fg(Color::White))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn option_style(option: &OptionView) -> Style {
    if option.revealed_correct {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else if option.selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn draw_options(f: &mut Frame, q: &QuestionView, area: Rect) {
    let items: Vec<ListItem> = q
        .options
        .iter()
        .map(|option| {
            let marker = if option.selected { "* " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}. {}", option.key.as_str(), option.text),
                    option_style(option),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Answers ")
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(List::new(items).block(block), area);
}

fn draw_feedback(f: &mut Frame, q: &QuestionView, area: Rect) {
    let line = match (&q.mode, &q.feedback) {
        // Feedback left over from the question just answered
        (Mode::Learning, Some(fb)) if fb.question_number != q.position => {
            let (verdict, color) = if fb.correct {
                ("correct".to_string(), Color::Green)
            } else {
                (
                    format!("wrong, the answer was {}", fb.correct_option.as_str()),
                    Color::Red,
                )
            };
            Line::from(vec![
                Span::styled(
                    format!("Question {}: {}", fb.question_number, verdict),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!("  Score: {:.1}%", fb.score),
                    Style::default().fg(score_color(fb.score)),
                ),
            ])
        }
        (Mode::Learning, Some(fb)) if fb.correct => Line::from(vec![
            Span::styled("Correct!", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  Score: {:.1}%", fb.score),
                Style::default().fg(score_color(fb.score)),
            ),
        ]),
        (Mode::Learning, Some(fb)) => Line::from(vec![
            Span::styled(
                format!("Wrong! The correct answer is {}", fb.correct_option.as_str()),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  Score: {:.1}%", fb.score),
                Style::default().fg(score_color(fb.score)),
            ),
        ]),
        (Mode::Learning, None) => Line::from(Span::styled(
            "Pick an answer to get feedback",
            Style::default().fg(Color::DarkGray),
        )),
        (Mode::Test, _) => Line::from(Span::styled(
            "Feedback is revealed at the end of the test",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Feedback ")
        .title_style(Style::default().fg(Color::Magenta));

    f.render_widget(Paragraph::new(line).block(block), area);
}
