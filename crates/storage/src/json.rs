use async_trait::async_trait;
use quiz_core::model::Question;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::repository::{QuestionBank, QuestionRecord, StorageError, records_into_questions};

const BUNDLED_BANK: &str = include_str!("../data/questions.json");

#[derive(Debug, Clone)]
enum Source {
    Bundled,
    File(PathBuf),
}

/// Question bank backed by a JSON array of entries.
///
/// Either the dataset compiled into this crate or a file on disk.
#[derive(Debug, Clone)]
pub struct JsonQuestionBank {
    source: Source,
}

impl JsonQuestionBank {
    /// The sample bank shipped with the crate.
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            source: Source::Bundled,
        }
    }

    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }
}

/// Parse and validate a JSON bank document.
///
/// # Errors
///
/// Returns `StorageError::Parse` for malformed JSON, or the first validation error.
pub fn parse_bank(json: &str) -> Result<Vec<Question>, StorageError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
    debug!(entries = records.len(), "parsed question bank records");
    records_into_questions(records)
}

#[async_trait]
impl QuestionBank for JsonQuestionBank {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let questions = match &self.source {
            Source::Bundled => parse_bank(BUNDLED_BANK)?,
            Source::File(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| StorageError::Io {
                        path: path.clone(),
                        source,
                    })?;
                parse_bank(&text)?
            }
        };
        info!(count = questions.len(), source = %self.describe(), "question bank loaded");
        Ok(questions)
    }

    fn describe(&self) -> String {
        match &self.source {
            Source::Bundled => "bundled".to_owned(),
            Source::File(path) => path.display().to_string(),
        }
    }
}
