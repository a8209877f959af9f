use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QcmError>;

#[derive(Debug, Error)]
pub enum QcmError {
    #[error("question directory not found: {}", .0.display())]
    MissingQuestionDir(PathBuf),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed question set {}: {source}", path.display())]
    MalformedQuestionSet {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("question set '{0}' has no questions")]
    EmptyQuestionSet(String),

    #[error("corrupt result log {}: {source}", path.display())]
    CorruptHistory {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode result log: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("unknown test: {0}")]
    UnknownTest(String),
}

impl QcmError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QcmError::Io {
            path: path.into(),
            source,
        }
    }
}
