use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp layout written to the result log (local time, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
    E,
}

impl OptionKey {
    pub const ALL: [OptionKey; 5] = [
        OptionKey::A,
        OptionKey::B,
        OptionKey::C,
        OptionKey::D,
        OptionKey::E,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
            OptionKey::E => "E",
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionKey::A),
            'B' => Some(OptionKey::B),
            'C' => Some(OptionKey::C),
            'D' => Some(OptionKey::D),
            'E' => Some(OptionKey::E),
            _ => None,
        }
    }
}

/// One multiple-choice question as stored in a question-set file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
    #[serde(rename = "E")]
    pub e: String,
    pub correct_answer: OptionKey,
}

impl Question {
    pub fn option(&self, key: OptionKey) -> &str {
        match key {
            OptionKey::A => &self.a,
            OptionKey::B => &self.b,
            OptionKey::C => &self.c,
            OptionKey::D => &self.d,
            OptionKey::E => &self.e,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSet {
    pub name: String,
    pub questions: BTreeMap<String, Question>,
}

impl QuestionSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn entries(&self) -> Vec<(String, Question)> {
        self.questions
            .iter()
            .map(|(id, q)| (id.clone(), q.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Learning,
    Test,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Learning => "learning",
            Mode::Test => "test",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Learning => "Learning Mode",
            Mode::Test => "Test Mode",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Mode::Learning => "Immediate feedback, show answers, move freely between questions",
            Mode::Test => "No feedback until the end, final score revealed at completion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub selected: OptionKey,
    pub correct: OptionKey,
}

impl AnswerRecord {
    pub fn is_correct(&self) -> bool {
        self.selected == self.correct
    }
}

/// Percentage of correct records, 0 when there are none.
pub fn score_of<'a>(answers: impl IntoIterator<Item = &'a AnswerRecord>) -> f64 {
    let (total, correct) = answers
        .into_iter()
        .fold((0usize, 0usize), |(total, correct), a| {
            (total + 1, correct + usize::from(a.is_correct()))
        });
    if total == 0 {
        0.0
    } else {
        (correct as f64 / total as f64) * 100.0
    }
}

// Persisted summary of one completed attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_name: String,
    pub mode: Mode,
    pub timestamp: String,
    pub answers: Vec<AnswerRecord>,
    pub score: f64,
}

impl TestResult {
    pub fn new(
        test_name: impl Into<String>,
        mode: Mode,
        answers: Vec<AnswerRecord>,
        at: DateTime<Local>,
    ) -> Self {
        let score = score_of(&answers);
        Self {
            test_name: test_name.into(),
            mode,
            timestamp: at.naive_local().format(TIMESTAMP_FORMAT).to_string(),
            answers,
            score,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct()).count()
    }

    /// `YYYY-MM-DD HH:MM`, or the raw prefix when the timestamp does not parse.
    pub fn display_date(&self) -> String {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        self.timestamp.chars().take(16).collect()
    }
}

/// Learning-mode reaction to a selected option.
///
/// `question_number` is the 1-based position of the answered question; the
/// session may already have moved past it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub question_number: usize,
    pub correct: bool,
    pub correct_option: OptionKey,
    pub score: f64,
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
