use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{QcmError, Result};
use crate::models::{score_of, AnswerRecord, Feedback, Mode, OptionKey, Question};
use crate::repository::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TestSelection,
    ModeSelection,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Discrete user intents reported by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectTest(String),
    SelectMode(Mode),
    SelectOption(OptionKey),
    Navigate(Direction),
    ToggleShowAnswer,
    GoHome,
    Restart,
}

/// Everything that changes while the user takes a test.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub current_test: Option<String>,
    pub mode: Option<Mode>,
    pub current_question_index: usize,
    pub answers: BTreeMap<usize, AnswerRecord>,
    pub shuffled_questions: Option<Vec<(String, Question)>>,
    pub show_answer: bool,
    pub answered: bool,
    pub feedback: Option<Feedback>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn screen(&self) -> Screen {
        if self.current_test.is_none() {
            Screen::TestSelection
        } else if self.mode.is_none() {
            Screen::ModeSelection
        } else if self.is_finished() {
            Screen::Completed
        } else {
            Screen::InProgress
        }
    }

    pub fn question_count(&self) -> usize {
        self.shuffled_questions.as_ref().map_or(0, Vec::len)
    }

    /// Past the end, or sitting on the last question with it answered.
    pub fn is_finished(&self) -> bool {
        let len = self.question_count();
        if self.current_question_index >= len {
            return true;
        }
        self.current_question_index == len - 1
            && self.answers.contains_key(&self.current_question_index)
    }

    pub fn current_question(&self) -> Option<&(String, Question)> {
        self.shuffled_questions
            .as_ref()
            .and_then(|qs| qs.get(self.current_question_index))
    }

    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        self.answers.get(&self.current_question_index)
    }

    pub fn calculate_score(&self) -> f64 {
        score_of(self.answers.values())
    }

    pub fn is_learning(&self) -> bool {
        self.mode == Some(Mode::Learning)
    }

    pub fn can_navigate(&self, direction: Direction) -> bool {
        if !self.is_learning() || self.screen() != Screen::InProgress {
            return false;
        }
        match direction {
            Direction::Previous => self.current_question_index > 0,
            Direction::Next => self.current_question_index + 1 < self.question_count(),
        }
    }

    /// Answer records in question order, as they are persisted.
    pub fn answer_list(&self) -> Vec<AnswerRecord> {
        self.answers.values().cloned().collect()
    }

    fn select_test(&mut self, name: &str, catalog: &Catalog) -> Result<bool> {
        if !catalog.contains_key(name) {
            return Err(QcmError::UnknownTest(name.to_string()));
        }
        self.current_test = Some(name.to_string());
        tracing::debug!(test = name, "test selected");
        Ok(true)
    }

    fn select_mode<R: Rng + ?Sized>(
        &mut self,
        mode: Mode,
        catalog: &Catalog,
        rng: &mut R,
    ) -> Result<bool> {
        let name = self.current_test.clone().unwrap_or_default();
        let set = catalog
            .get(&name)
            .ok_or_else(|| QcmError::UnknownTest(name.clone()))?;

        let mut questions = set.entries();
        questions.shuffle(rng);

        self.mode = Some(mode);
        self.current_question_index = 0;
        self.answers.clear();
        self.shuffled_questions = Some(questions);
        self.show_answer = false;
        self.answered = false;
        self.feedback = None;

        tracing::info!(test = %name, mode = mode.as_str(), questions = set.len(), "attempt started");
        Ok(true)
    }

    fn select_option(&mut self, option: OptionKey) -> bool {
        let Some((_, question)) = self.current_question() else {
            return false;
        };
        let record = AnswerRecord {
            question: question.question.clone(),
            selected: option,
            correct: question.correct_answer,
        };
        let correct = record.is_correct();
        let correct_option = record.correct;
        self.answers.insert(self.current_question_index, record);

        if self.is_learning() {
            self.answered = true;
            self.feedback = Some(Feedback {
                question_number: self.current_question_index + 1,
                correct,
                correct_option,
                score: self.calculate_score(),
            });
        }

        if self.current_question_index + 1 < self.question_count() {
            self.current_question_index += 1;
            self.show_answer = false;
            self.answered = false;
        }
        true
    }

    fn navigate(&mut self, direction: Direction) -> bool {
        if !self.can_navigate(direction) {
            return false;
        }
        match direction {
            Direction::Previous => self.current_question_index -= 1,
            Direction::Next => self.current_question_index += 1,
        }
        self.show_answer = false;
        self.answered = false;
        self.feedback = None;
        true
    }
}

/// Applies one action to the session. Returns whether anything changed;
/// actions that do not fit the current screen are ignored.
pub fn apply_action<R: Rng + ?Sized>(
    state: &mut SessionState,
    action: &Action,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<bool> {
    let screen = state.screen();
    match (screen, action) {
        (_, Action::GoHome) => {
            state.reset();
            Ok(true)
        }
        (Screen::Completed, Action::Restart) => {
            state.reset();
            Ok(true)
        }
        (Screen::TestSelection, Action::SelectTest(name)) => state.select_test(name, catalog),
        (Screen::ModeSelection, Action::SelectMode(mode)) => state.select_mode(*mode, catalog, rng),
        (Screen::InProgress, Action::SelectOption(option)) => Ok(state.select_option(*option)),
        (Screen::InProgress, Action::Navigate(direction)) => Ok(state.navigate(*direction)),
        (Screen::InProgress, Action::ToggleShowAnswer) if state.is_learning() => {
            state.show_answer = !state.show_answer;
            Ok(true)
        }
        _ => {
            tracing::trace!(?screen, ?action, "ignored action");
            Ok(false)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::QuestionSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub(crate) fn question(text: &str, correct: OptionKey) -> Question {
        Question {
            question: text.to_string(),
            a: "alpha".to_string(),
            b: "bravo".to_string(),
            c: "charlie".to_string(),
            d: "delta".to_string(),
            e: "echo".to_string(),
            correct_answer: correct,
        }
    }

    pub(crate) fn catalog_with(name: &str, count: usize) -> Catalog {
        let questions = (0..count)
            .map(|i| (format!("Q{}", i + 1), question(&format!("Question {}", i + 1), OptionKey::A)))
            .collect();
        let mut catalog = Catalog::new();
        catalog.insert(
            name.to_string(),
            QuestionSet {
                name: name.to_string(),
                questions,
            },
        );
        catalog
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn started(mode: Mode, count: usize) -> (SessionState, Catalog) {
        let catalog = catalog_with("Quiz", count);
        let mut state = SessionState::new();
        let mut r = rng();
        apply_action(&mut state, &Action::SelectTest("Quiz".into()), &catalog, &mut r).unwrap();
        apply_action(&mut state, &Action::SelectMode(mode), &catalog, &mut r).unwrap();
        (state, catalog)
    }

    fn apply(state: &mut SessionState, catalog: &Catalog, action: Action) -> bool {
        apply_action(state, &action, catalog, &mut rng()).unwrap()
    }

    mod screen_tests {
        use super::*;

        #[test]
        fn default_is_test_selection() {
            assert_eq!(SessionState::new().screen(), Screen::TestSelection);
        }

        #[test]
        fn select_test_moves_to_mode_selection() {
            let catalog = catalog_with("Quiz", 3);
            let mut state = SessionState::new();
            assert!(apply(&mut state, &catalog, Action::SelectTest("Quiz".into())));
            assert_eq!(state.current_test.as_deref(), Some("Quiz"));
            assert_eq!(state.screen(), Screen::ModeSelection);
        }

        #[test]
        fn select_unknown_test_is_an_error() {
            let catalog = catalog_with("Quiz", 3);
            let mut state = SessionState::new();
            let err = apply_action(
                &mut state,
                &Action::SelectTest("Nope".into()),
                &catalog,
                &mut rng(),
            )
            .unwrap_err();
            assert!(matches!(err, QcmError::UnknownTest(_)));
            assert_eq!(state.screen(), Screen::TestSelection);
        }

        #[test]
        fn select_mode_starts_attempt() {
            let (state, _) = started(Mode::Test, 4);
            assert_eq!(state.screen(), Screen::InProgress);
            assert_eq!(state.mode, Some(Mode::Test));
            assert_eq!(state.current_question_index, 0);
            assert_eq!(state.question_count(), 4);
        }

        #[test]
        fn actions_for_other_screens_are_ignored() {
            let catalog = catalog_with("Quiz", 2);
            let mut state = SessionState::new();
            assert!(!apply(&mut state, &catalog, Action::SelectMode(Mode::Test)));
            assert!(!apply(&mut state, &catalog, Action::SelectOption(OptionKey::A)));
            assert!(!apply(&mut state, &catalog, Action::Restart));
            assert_eq!(state, SessionState::new());
        }

        #[test]
        fn go_home_resets_from_anywhere() {
            let (mut state, catalog) = started(Mode::Learning, 3);
            apply(&mut state, &catalog, Action::SelectOption(OptionKey::B));
            assert!(apply(&mut state, &catalog, Action::GoHome));
            assert_eq!(state, SessionState::new());
        }
    }

    mod shuffle_tests {
        use super::*;

        #[test]
        fn shuffle_is_a_permutation() {
            for count in [1, 2, 5, 20] {
                let (state, catalog) = started(Mode::Test, count);
                let mut shuffled: Vec<(String, Question)> =
                    state.shuffled_questions.clone().unwrap();
                assert_eq!(shuffled.len(), count);
                shuffled.sort_by(|a, b| a.0.cmp(&b.0));
                assert_eq!(shuffled, catalog["Quiz"].entries());
            }
        }

        #[test]
        fn order_is_stable_while_answering() {
            let (mut state, catalog) = started(Mode::Learning, 5);
            let order = state.shuffled_questions.clone();
            apply(&mut state, &catalog, Action::SelectOption(OptionKey::A));
            apply(&mut state, &catalog, Action::Navigate(Direction::Previous));
            apply(&mut state, &catalog, Action::ToggleShowAnswer);
            assert_eq!(state.shuffled_questions, order);
        }

        #[test]
        fn new_attempt_resets_answers_and_index() {
            let (mut state, catalog) = started(Mode::Test, 3);
            apply(&mut state, &catalog, Action::SelectOption(OptionKey::A));
            apply(&mut state, &catalog, Action::SelectOption(OptionKey::B));
            assert_eq!(state.answers.len(), 2);

            apply(&mut state, &catalog, Action::GoHome);
            apply(&mut state, &catalog, Action::SelectTest("Quiz".into()));
            apply(&mut state, &catalog, Action::SelectMode(Mode::Learning));
            assert!(state.answers.is_empty());
            assert_eq!(state.current_question_index, 0);
        }
    }

    mod answer_tests {
        use super::*;

        #[test]
        fn select_option_records_and_advances() {
            let (mut state, catalog) = started(Mode::Test, 3);
            let text = state.current_question().unwrap().1.question.clone();
            assert!(apply(&mut state, &catalog, Action::SelectOption(OptionKey::C)));

            assert_eq!(state.current_question_index, 1);
            let record = &state.answers[&0];
            assert_eq!(record.question, text);
            assert_eq!(record.selected, OptionKey::C);
            assert_eq!(record.correct, OptionKey::A);
        }

        #[test]
        fn last_question_stays_and_completes() {
            let (mut state, catalog) = started(Mode::Test, 2);
            apply(&mut state, &catalog, Action::SelectOption(OptionKey::A));
            assert_eq!(state.screen(), Screen::InProgress);

            apply(&mut state, &catalog, Action::SelectOption(OptionKey::A));
            assert_eq!(state.current_question_index, 1);
            assert_eq!(state.screen(), Screen::Completed);
        }

        #[test]
        fn test_mode_gives_no_feedback() {
            let (mut state, catalog) = started(Mode::Test, 2);
            apply(&mut state, &catalog, Action::SelectOption(OptionKey::A));
            assert!(state.feedback.is_none());
            assert!(!state.answered);
        }

        #[test]
        fn learning_mode_gives_feedback_with_running_score() {
            let (mut state, catalog) = started(Mode::Learning, 3);
            apply(&mut state, &catalog, Action::SelectOption(OptionKey::A));
            let fb = state.feedback.unwrap();
            assert!(fb.correct);
            assert_eq!(fb.question_number, 1);
            assert_eq!(fb.score, 100.0);

            apply(&mut state, &catalog, Action::SelectOption(OptionKey::D));
            let fb = state.feedback.unwrap();
            assert!(!fb.correct);
            assert_eq!(fb.correct_option, OptionKey::A);
            assert_eq!(fb.question_number, 2);
            assert_eq!(fb.score, 50.0);
        }

        #[test]
        fn learning_mode_last_answer_marks_answered() {
            let (mut state, catalog) = started(Mode::Learning, 1);
            apply(&mut state, &catalog, Action::SelectOption(OptionKey::A));
            assert!(state.answered);
            assert_eq!(state.screen(), Screen::Completed);
        }

        #[test]
        fn reanswering_overwrites_record() {
            let (mut state, catalog) = started(Mode::Learning, 3);
            apply(&mut state, &catalog, Action::SelectOption(OptionKey::B));
            apply(&mut state, &catalog, Action::Navigate(Direction::Previous));
            assert_eq!(state.current_question_index, 0);

            apply(&mut state, &catalog, Action::SelectOption(OptionKey::A));
            assert_eq!(state.answers.len(), 1);
            assert_eq!(state.answers[&0].selected, OptionKey::A);
            assert_eq!(state.calculate_score(), 100.0);
        }

        #[test]
        fn calculate_score_empty_is_zero() {
            let (state, _) = started(Mode::Test, 3);
            assert_eq!(state.calculate_score(), 0.0);
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn previous_at_start_is_rejected() {
            let (mut state, catalog) = started(Mode::Learning, 3);
            let before = state.clone();
            assert!(!state.can_navigate(Direction::Previous));
            assert!(!apply(&mut state, &catalog, Action::Navigate(Direction::Previous)));
            assert_eq!(state, before);
        }

        #[test]
        fn next_at_end_is_rejected() {
            let (mut state, catalog) = started(Mode::Learning, 2);
            assert!(apply(&mut state, &catalog, Action::Navigate(Direction::Next)));
            assert_eq!(state.current_question_index, 1);
            assert!(!apply(&mut state, &catalog, Action::Navigate(Direction::Next)));
            assert_eq!(state.current_question_index, 1);
        }

        #[test]
        fn navigation_clears_display_flags() {
            let (mut state, catalog) = started(Mode::Learning, 3);
            apply(&mut state, &catalog, Action::ToggleShowAnswer);
            assert!(state.show_answer);
            apply(&mut state, &catalog, Action::Navigate(Direction::Next));
            assert!(!state.show_answer);
            assert!(!state.answered);
            assert!(state.feedback.is_none());
        }

        #[test]
        fn test_mode_cannot_navigate_or_reveal() {
            let (mut state, catalog) = started(Mode::Test, 3);
            assert!(!apply(&mut state, &catalog, Action::Navigate(Direction::Next)));
            assert!(!apply(&mut state, &catalog, Action::ToggleShowAnswer));
            assert_eq!(state.current_question_index, 0);
            assert!(!state.show_answer);
        }

        #[test]
        fn toggle_show_answer_does_not_touch_answers() {
            let (mut state, catalog) = started(Mode::Learning, 3);
            apply(&mut state, &catalog, Action::ToggleShowAnswer);
            apply(&mut state, &catalog, Action::ToggleShowAnswer);
            assert!(!state.show_answer);
            assert!(state.answers.is_empty());
        }
    }
}
