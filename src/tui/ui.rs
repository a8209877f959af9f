use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{modes, question, results, sidebar, test_list};
use super::{App, Status};
use crate::models::Mode;
use crate::session::Screen;
use crate::view::{Body, ViewModel};

pub fn draw(f: &mut Frame, app: &App) {
    let vm = app.controller().view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Screen tabs
            Constraint::Min(0),    // Content + sidebar
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, &vm, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    draw_content(f, app, &vm, body[0]);
    sidebar::draw(f, &vm, body[1]);
    draw_status(f, app, chunks[2]);
    draw_help_bar(f, &vm, chunks[3]);
}

fn draw_tabs(f: &mut Frame, vm: &ViewModel, area: Rect) {
    let tab_titles = vec!["Tests", "Mode", "Questions", "Results"];
    let selected = match vm.screen() {
        Screen::TestSelection => 0,
        Screen::ModeSelection => 1,
        Screen::InProgress => 2,
        Screen::Completed => 3,
    };

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(" QCM "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content(f: &mut Frame, app: &App, vm: &ViewModel, area: Rect) {
    match &vm.body {
        Body::TestSelection { tests: summaries } => {
            test_list::draw(f, summaries, app.tests.selected, area)
        }
        Body::ModeSelection { test_name } => {
            modes::draw(f, test_name, &app.modes.items, app.modes.selected, area)
        }
        Body::InProgress(q) => question::draw(f, q, area),
        Body::Completed(r) => results::draw(f, r, area),
    }
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status {
        Some(Status::Error(msg)) => Line::from(vec![
            Span::styled("! ", Style::default().fg(Color::Red)),
            Span::styled(msg.as_str(), Style::default().fg(Color::Red)),
        ]),
        Some(Status::Info(msg)) => Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_help_bar(f: &mut Frame, vm: &ViewModel, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));

    let mut spans = Vec::new();
    match &vm.body {
        Body::TestSelection { .. } => {
            spans.extend(vec![
                key("j/k"),
                Span::raw(" Nav  "),
                key("l/<CR>"),
                Span::raw(" Start  "),
                key("^r"),
                Span::raw(" Reload  "),
            ]);
        }
        Body::ModeSelection { .. } => {
            spans.extend(vec![
                key("j/k"),
                Span::raw(" Nav  "),
                key("<CR>"),
                Span::raw(" Choose  "),
                key("1/2"),
                Span::raw(" Learning/Test  "),
                key("<Esc>"),
                Span::raw(" Home  "),
            ]);
        }
        Body::InProgress(q) => {
            spans.extend(vec![key("a-e"), Span::raw(" Answer  ")]);
            if q.mode == Mode::Learning {
                spans.extend(vec![
                    key("h/l"),
                    Span::raw(" Prev/Next  "),
                    key("s"),
                    Span::raw(" Show answer  "),
                ]);
            }
            spans.extend(vec![key("<Esc>"), Span::raw(" Home  ")]);
        }
        Body::Completed(_) => {
            spans.extend(vec![
                key("<CR>"),
                Span::raw(" Take another test  "),
            ]);
        }
    }
    spans.extend(vec![key("q"), Span::raw(" Quit")]);

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    f.render_widget(help, area);
}
