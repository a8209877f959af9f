use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{QcmError, Result};
use crate::models::{Question, QuestionSet};

/// Loaded question sets keyed by test name, sorted by name.
pub type Catalog = BTreeMap<String, QuestionSet>;

const QUESTION_FILE_EXT: &str = "json";

pub struct QuestionRepository {
    dir: PathBuf,
}

impl QuestionRepository {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads every `<TestName>.json` file in the directory.
    ///
    /// Any unreadable or malformed file fails the whole load; callers never
    /// see a partial catalog.
    pub fn load_available_tests(&self) -> Result<Catalog> {
        if !self.dir.is_dir() {
            return Err(QcmError::MissingQuestionDir(self.dir.clone()));
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| QcmError::io(&self.dir, e))?;

        let mut catalog = Catalog::new();
        for entry in entries {
            let path = entry.map_err(|e| QcmError::io(&self.dir, e))?.path();
            if !is_question_file(&path) {
                continue;
            }
            let set = load_question_set(&path)?;
            tracing::debug!(test = %set.name, questions = set.len(), "loaded question set");
            catalog.insert(set.name.clone(), set);
        }

        tracing::info!(dir = %self.dir.display(), tests = catalog.len(), "loaded tests");
        Ok(catalog)
    }

    pub fn load_test(&self, name: &str) -> Result<QuestionSet> {
        let path = self.dir.join(format!("{}.{}", name, QUESTION_FILE_EXT));
        if !path.is_file() {
            return Err(QcmError::UnknownTest(name.to_string()));
        }
        load_question_set(&path)
    }
}

fn is_question_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(QUESTION_FILE_EXT)
}

fn load_question_set(path: &Path) -> Result<QuestionSet> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let content = std::fs::read_to_string(path).map_err(|e| QcmError::io(path, e))?;
    let questions: BTreeMap<String, Question> =
        serde_json::from_str(&content).map_err(|source| QcmError::MalformedQuestionSet {
            path: path.to_path_buf(),
            source,
        })?;

    let set = QuestionSet { name, questions };
    if set.is_empty() {
        return Err(QcmError::EmptyQuestionSet(set.name));
    }
    Ok(set)
}
