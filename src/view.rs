//! Immutable snapshots of the session for the front end to draw.

use crate::models::{Feedback, Mode, OptionKey, TestResult};
use crate::repository::Catalog;
use crate::session::{Direction, Screen, SessionState};

pub const HISTORY_SIDEBAR_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub body: Body,
    pub history: Vec<HistoryEntry>,
}

impl ViewModel {
    pub fn screen(&self) -> Screen {
        match self.body {
            Body::TestSelection { .. } => Screen::TestSelection,
            Body::ModeSelection { .. } => Screen::ModeSelection,
            Body::InProgress(_) => Screen::InProgress,
            Body::Completed(_) => Screen::Completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    TestSelection { tests: Vec<TestSummary> },
    ModeSelection { test_name: String },
    InProgress(QuestionView),
    Completed(ResultView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestSummary {
    pub name: String,
    pub question_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionView {
    pub key: OptionKey,
    pub text: String,
    pub selected: bool,
    /// Highlighted as the right answer (learning mode with show-answer on).
    pub revealed_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub test_name: String,
    pub mode: Mode,
    /// 1-based position in the shuffled order.
    pub position: usize,
    pub total: usize,
    pub progress: f64,
    pub text: String,
    pub options: Vec<OptionView>,
    pub current_score: Option<f64>,
    pub feedback: Option<Feedback>,
    pub show_answer: bool,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub number: usize,
    pub question: String,
    pub selected: OptionKey,
    pub correct: OptionKey,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub test_name: String,
    pub mode: Mode,
    pub score: f64,
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
    pub feedback: Option<Feedback>,
    pub breakdown: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub test_name: String,
    pub mode: Mode,
    pub score: f64,
    pub date: String,
}

impl From<&TestResult> for HistoryEntry {
    fn from(result: &TestResult) -> Self {
        Self {
            test_name: result.test_name.clone(),
            mode: result.mode,
            score: result.score,
            date: result.display_date(),
        }
    }
}

pub fn render(state: &SessionState, catalog: &Catalog, history: &[TestResult]) -> ViewModel {
    let skip = history.len().saturating_sub(HISTORY_SIDEBAR_LIMIT);
    let history = history[skip..].iter().map(HistoryEntry::from).collect();

    let body = match state.screen() {
        Screen::TestSelection => Body::TestSelection {
            tests: catalog
                .values()
                .map(|set| TestSummary {
                    name: set.name.clone(),
                    question_count: set.len(),
                })
                .collect(),
        },
        Screen::ModeSelection => Body::ModeSelection {
            test_name: state.current_test.clone().unwrap_or_default(),
        },
        Screen::InProgress => Body::InProgress(question_view(state)),
        Screen::Completed => Body::Completed(result_view(state)),
    };

    ViewModel { body, history }
}

fn question_view(state: &SessionState) -> QuestionView {
    let mode = state.mode.unwrap_or(Mode::Test);
    let learning = mode == Mode::Learning;
    let total = state.question_count();
    let index = state.current_question_index;
    let selected = state.current_answer().map(|a| a.selected);

    let (text, options) = match state.current_question() {
        Some((_, q)) => (
            q.question.clone(),
            OptionKey::ALL
                .iter()
                .map(|&key| OptionView {
                    key,
                    text: q.option(key).to_string(),
                    selected: selected == Some(key),
                    revealed_correct: learning && state.show_answer && key == q.correct_answer,
                })
                .collect(),
        ),
        None => (String::new(), Vec::new()),
    };

    QuestionView {
        test_name: state.current_test.clone().unwrap_or_default(),
        mode,
        position: index + 1,
        total,
        progress: if total == 0 {
            0.0
        } else {
            (index + 1) as f64 / total as f64
        },
        text,
        options,
        current_score: (learning && !state.answers.is_empty()).then(|| state.calculate_score()),
        feedback: if learning { state.feedback } else { None },
        show_answer: learning && state.show_answer,
        can_go_previous: state.can_navigate(Direction::Previous),
        can_go_next: state.can_navigate(Direction::Next),
    }
}

fn result_view(state: &SessionState) -> ResultView {
    let breakdown: Vec<BreakdownRow> = state
        .answers
        .values()
        .enumerate()
        .map(|(i, a)| BreakdownRow {
            number: i + 1,
            question: a.question.clone(),
            selected: a.selected,
            correct: a.correct,
            is_correct: a.is_correct(),
        })
        .collect();

    let mode = state.mode.unwrap_or(Mode::Test);
    ResultView {
        test_name: state.current_test.clone().unwrap_or_default(),
        mode,
        score: state.calculate_score(),
        correct: breakdown.iter().filter(|r| r.is_correct).count(),
        answered: breakdown.len(),
        total: state.question_count(),
        feedback: if mode == Mode::Learning {
            state.feedback
        } else {
            None
        },
        breakdown,
    }
}
