mod ui;
mod widgets;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::controller::Controller;
use crate::models::{Mode, OptionKey};
use crate::session::{Action, Direction, Screen};

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i >= self.items.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i == 0 {
                    self.items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

pub enum Status {
    Info(String),
    Error(String),
}

pub struct App {
    controller: Controller,
    pub tests: StatefulList<String>,
    pub modes: StatefulList<Mode>,
    pub status: Option<Status>,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let tests = StatefulList::with_items(controller.catalog().keys().cloned().collect());
        Self {
            controller,
            tests,
            modes: StatefulList::with_items(vec![Mode::Learning, Mode::Test]),
            status: None,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    fn screen(&self) -> Screen {
        self.controller.session().screen()
    }

    // Keep the test list in step with the catalog after a reload
    fn sync_tests(&mut self) {
        let names: Vec<String> = self.controller.catalog().keys().cloned().collect();
        if names != self.tests.items {
            let keep = self.tests.selected.filter(|&i| i < names.len());
            self.tests = StatefulList::with_items(names);
            if keep.is_some() {
                self.tests.selected = keep;
            }
        }
    }

    fn perform(&mut self, action: Action) {
        match self.controller.dispatch(action) {
            Ok(_) => {
                self.status = self.controller.completed().map(|r| {
                    Status::Info(format!("Saved {} result: {:.1}%", r.test_name, r.score))
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "action failed");
                self.status = Some(Status::Error(e.to_string()));
            }
        }
        self.sync_tests();
    }

    fn refresh_data(&mut self) {
        match self.controller.reload() {
            Ok(()) => self.status = Some(Status::Info("Reloaded tests and history".to_string())),
            Err(e) => {
                tracing::error!(error = %e, "reload failed");
                self.status = Some(Status::Error(e.to_string()));
            }
        }
        self.sync_tests();
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            // Refresh: Ctrl+r (vim-like redo/refresh)
            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.refresh_data();
                return;
            }
            KeyCode::Esc | KeyCode::Char('H') => {
                self.perform(Action::GoHome);
                return;
            }
            _ => {}
        }

        match self.screen() {
            Screen::TestSelection => match key {
                KeyCode::Char('j') | KeyCode::Down => self.tests.next(),
                KeyCode::Char('k') | KeyCode::Up => self.tests.previous(),
                KeyCode::Char('g') if !self.tests.items.is_empty() => {
                    self.tests.selected = Some(0);
                }
                KeyCode::Char('G') if !self.tests.items.is_empty() => {
                    self.tests.selected = Some(self.tests.items.len() - 1);
                }
                KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                    if let Some(name) = self.tests.selected_item().cloned() {
                        self.perform(Action::SelectTest(name));
                    }
                }
                _ => {}
            },

            Screen::ModeSelection => match key {
                KeyCode::Char('j') | KeyCode::Down => self.modes.next(),
                KeyCode::Char('k') | KeyCode::Up => self.modes.previous(),
                KeyCode::Char('1') => self.perform(Action::SelectMode(Mode::Learning)),
                KeyCode::Char('2') => self.perform(Action::SelectMode(Mode::Test)),
                KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                    if let Some(mode) = self.modes.selected_item().copied() {
                        self.perform(Action::SelectMode(mode));
                    }
                }
                _ => {}
            },

            Screen::InProgress => match key {
                KeyCode::Char(c @ 'a'..='e') | KeyCode::Char(c @ 'A'..='E') => {
                    if let Some(option) = OptionKey::from_char(c) {
                        self.perform(Action::SelectOption(option));
                    }
                }
                KeyCode::Char('h') | KeyCode::Left => {
                    self.perform(Action::Navigate(Direction::Previous));
                }
                KeyCode::Char('l') | KeyCode::Right => {
                    self.perform(Action::Navigate(Direction::Next));
                }
                KeyCode::Char('s') => self.perform(Action::ToggleShowAnswer),
                _ => {}
            },

            Screen::Completed => {
                if matches!(key, KeyCode::Enter | KeyCode::Char('r')) {
                    self.perform(Action::Restart);
                }
            }
        }
    }
}

pub fn run(controller: Controller) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::history::ResultLog;
    use crate::repository::QuestionRepository;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    const SETS: [(&str, &str); 2] = [
        (
            "Arithmetic.json",
            r#"{
                "Q1": {"question": "2+2?", "A":"3","B":"4","C":"5","D":"6","E":"7","correct_answer":"B"},
                "Q2": {"question": "3*3?", "A":"6","B":"8","C":"9","D":"12","E":"33","correct_answer":"C"}
            }"#,
        ),
        (
            "Geography.json",
            r#"{"G1": {"question": "Capital of France?", "A":"Rome","B":"Paris","C":"Oslo","D":"Bern","E":"Lima","correct_answer":"B"}}"#,
        ),
    ];

    pub(crate) fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let questions = dir.path().join("questions");
        std::fs::create_dir_all(&questions).unwrap();
        for (name, content) in SETS {
            std::fs::write(questions.join(name), content).unwrap();
        }
        let controller = Controller::with_rng(
            QuestionRepository::new(&questions),
            ResultLog::in_dir(dir.path().join("results")),
            StdRng::seed_from_u64(1),
        )
        .expect("Failed to open controller");
        (dir, App::new(controller))
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    mod stateful_list_tests {
        use super::*;

        #[test]
        fn next_wraps_around() {
            let mut list = StatefulList::with_items(vec![1, 2, 3]);
            list.next();
            list.next();
            list.next();
            assert_eq!(list.selected, Some(0));
        }

        #[test]
        fn previous_wraps_around() {
            let mut list = StatefulList::with_items(vec![1, 2, 3]);
            list.previous();
            assert_eq!(list.selected, Some(2));
        }

        #[test]
        fn empty_list_has_no_selection() {
            let mut list: StatefulList<i32> = StatefulList::with_items(vec![]);
            list.next();
            assert_eq!(list.selected, None);
            assert!(list.selected_item().is_none());
        }
    }

    mod key_tests {
        use super::*;

        #[test]
        fn enter_selects_highlighted_test() {
            let (_dir, mut app) = setup_app();
            press(&mut app, KeyCode::Char('j'));
            press(&mut app, KeyCode::Enter);
            assert_eq!(
                app.controller().session().current_test.as_deref(),
                Some("Geography")
            );
            assert_eq!(app.screen(), Screen::ModeSelection);
        }

        #[test]
        fn number_keys_pick_mode() {
            let (_dir, mut app) = setup_app();
            press(&mut app, KeyCode::Enter);
            press(&mut app, KeyCode::Char('2'));
            assert_eq!(app.controller().session().mode, Some(Mode::Test));
            assert_eq!(app.screen(), Screen::InProgress);
        }

        #[test]
        fn letter_keys_answer_and_finish() {
            let (_dir, mut app) = setup_app();
            press(&mut app, KeyCode::Char('j'));
            press(&mut app, KeyCode::Enter);
            press(&mut app, KeyCode::Char('1'));
            press(&mut app, KeyCode::Char('b'));

            assert_eq!(app.screen(), Screen::Completed);
            assert_eq!(app.controller().history().len(), 1);
            assert_eq!(app.controller().history()[0].score, 100.0);
            assert!(matches!(app.status, Some(Status::Info(_))));

            press(&mut app, KeyCode::Enter);
            assert_eq!(app.screen(), Screen::TestSelection);
        }

        #[test]
        fn learning_navigation_keys() {
            let (_dir, mut app) = setup_app();
            press(&mut app, KeyCode::Enter);
            press(&mut app, KeyCode::Char('1'));
            press(&mut app, KeyCode::Char('l'));
            assert_eq!(app.controller().session().current_question_index, 1);
            press(&mut app, KeyCode::Char('h'));
            assert_eq!(app.controller().session().current_question_index, 0);
            press(&mut app, KeyCode::Char('s'));
            assert!(app.controller().session().show_answer);
        }

        #[test]
        fn escape_goes_home() {
            let (_dir, mut app) = setup_app();
            press(&mut app, KeyCode::Enter);
            press(&mut app, KeyCode::Char('2'));
            press(&mut app, KeyCode::Esc);
            assert_eq!(app.screen(), Screen::TestSelection);
        }

        #[test]
        fn failed_reload_sets_status() {
            let (dir, mut app) = setup_app();
            std::fs::write(dir.path().join("questions/Broken.json"), "{").unwrap();
            app.handle_key(KeyCode::Char('r'), KeyModifiers::CONTROL);
            match &app.status {
                Some(Status::Error(msg)) => assert!(msg.contains("malformed")),
                _ => panic!("Expected error status"),
            }
            assert_eq!(app.tests.items.len(), 2);
        }

        #[test]
        fn quit_sets_flag() {
            let (_dir, mut app) = setup_app();
            press(&mut app, KeyCode::Char('q'));
            assert!(app.should_quit);
        }
    }
}
