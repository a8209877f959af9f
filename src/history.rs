use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{QcmError, Result};
use crate::models::TestResult;

pub const HISTORY_FILE_NAME: &str = "test_history.json";

/// Append-only list of completed attempts backed by a single JSON array.
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn in_dir<P: AsRef<Path>>(results_dir: P) -> Self {
        Self::new(results_dir.as_ref().join(HISTORY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty history; a corrupt one is an error.
    pub fn load_history(&self) -> Result<Vec<TestResult>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| QcmError::io(&self.path, e))?;
        serde_json::from_str(&content).map_err(|source| QcmError::CorruptHistory {
            path: self.path.clone(),
            source,
        })
    }

    /// The last `limit` results, oldest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<TestResult>> {
        let mut history = self.load_history()?;
        let skip = history.len().saturating_sub(limit);
        Ok(history.split_off(skip))
    }

    pub fn append(&self, result: &TestResult) -> Result<usize> {
        let mut history = self.load_history()?;
        history.push(result.clone());
        self.write_all(&history)?;

        tracing::info!(
            test = %result.test_name,
            mode = result.mode.as_str(),
            score = result.score,
            entries = history.len(),
            "appended test result"
        );
        Ok(history.len())
    }

    // Write to a sibling temp file, then rename over the log
    fn write_all(&self, history: &[TestResult]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| QcmError::io(&parent, e))?;

        let json = serde_json::to_string_pretty(history).map_err(QcmError::Encode)?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| HISTORY_FILE_NAME.to_string());
        let tmp_path = parent.join(format!(".{}.tmp", file_name));

        let mut file = std::fs::File::create(&tmp_path).map_err(|e| QcmError::io(&tmp_path, e))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| QcmError::io(&tmp_path, e))?;
        drop(file);

        std::fs::rename(&tmp_path, &self.path).map_err(|e| QcmError::io(&self.path, e))?;
        Ok(())
    }
}
