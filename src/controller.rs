use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::history::ResultLog;
use crate::models::{Mode, TestResult};
use crate::repository::{Catalog, QuestionRepository};
use crate::session::{apply_action, Action, Screen, SessionState};
use crate::view::{render, ViewModel};

/// Owns the session and its collaborators; the only place that writes to
/// the result log.
pub struct Controller {
    repository: QuestionRepository,
    log: ResultLog,
    catalog: Catalog,
    history: Vec<TestResult>,
    session: SessionState,
    completed: Option<TestResult>,
    rng: StdRng,
}

impl Controller {
    pub fn open(repository: QuestionRepository, log: ResultLog) -> Result<Self> {
        Self::with_rng(repository, log, StdRng::from_entropy())
    }

    pub fn with_rng(repository: QuestionRepository, log: ResultLog, rng: StdRng) -> Result<Self> {
        let catalog = repository.load_available_tests()?;
        let history = log.load_history()?;
        Ok(Self {
            repository,
            log,
            catalog,
            history,
            session: SessionState::new(),
            completed: None,
            rng,
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn history(&self) -> &[TestResult] {
        &self.history
    }

    /// The result recorded for the attempt currently on the results screen.
    pub fn completed(&self) -> Option<&TestResult> {
        self.completed.as_ref()
    }

    /// Re-reads question sets and history from disk. On error neither is
    /// replaced.
    pub fn reload(&mut self) -> Result<()> {
        let catalog = self.repository.load_available_tests()?;
        let history = self.log.load_history()?;
        self.catalog = catalog;
        self.history = history;
        Ok(())
    }

    pub fn dispatch(&mut self, action: Action) -> Result<bool> {
        let changed = apply_action(&mut self.session, &action, &self.catalog, &mut self.rng)?;
        let returned_home = changed && matches!(action, Action::GoHome | Action::Restart);

        match self.session.screen() {
            Screen::Completed if self.completed.is_none() => self.finish()?,
            Screen::Completed => {}
            _ => {
                self.completed = None;
                if returned_home {
                    self.reload()?;
                }
            }
        }
        Ok(changed)
    }

    pub fn view(&self) -> ViewModel {
        render(&self.session, &self.catalog, &self.history)
    }

    // Record the attempt exactly once, even if the write fails
    fn finish(&mut self) -> Result<()> {
        let result = TestResult::new(
            self.session.current_test.clone().unwrap_or_default(),
            self.session.mode.unwrap_or(Mode::Test),
            self.session.answer_list(),
            Local::now(),
        );
        self.completed = Some(result.clone());

        self.log.append(&result)?;
        self.history.push(result);
        Ok(())
    }
}
