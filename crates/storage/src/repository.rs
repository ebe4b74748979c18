use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Explanation used when a bank entry has none.
pub const DEFAULT_EXPLANATION: &str = "No explanation available.";

/// Errors surfaced by question bank sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed question bank: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question {id} is invalid: {source}")]
    Invalid {
        id: QuestionId,
        #[source]
        source: QuestionError,
    },

    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),

    #[error("question bank is empty")]
    Empty,
}

/// Persisted shape of a bank entry.
///
/// Mirrors the bundled JSON dataset so sources can deserialize without
/// leaking file-format concerns into the domain `Question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u64,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default = "default_explanation")]
    pub explanation: String,
    #[serde(default = "default_score")]
    pub score: u32,
}

fn default_explanation() -> String {
    DEFAULT_EXPLANATION.to_owned()
}

fn default_score() -> u32 {
    1
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().value(),
            question: question.text().to_owned(),
            options: question.options().to_vec(),
            answer: question.correct_letter().to_string(),
            explanation: question.explanation().to_owned(),
            score: question.points(),
        }
    }

    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Invalid` when the entry breaks a question invariant.
    pub fn into_question(self) -> Result<Question, StorageError> {
        let id = QuestionId::new(self.id);
        Question::new(
            id,
            self.question,
            self.options,
            &self.answer,
            self.score,
            self.explanation,
        )
        .map_err(|source| StorageError::Invalid { id, source })
    }
}

/// Validate a full list of records: every entry well-formed, ids unique, list non-empty.
///
/// # Errors
///
/// Returns the first `StorageError` encountered, in bank order.
pub fn records_into_questions(records: Vec<QuestionRecord>) -> Result<Vec<Question>, StorageError> {
    if records.is_empty() {
        return Err(StorageError::Empty);
    }

    let mut seen = HashSet::with_capacity(records.len());
    let mut questions = Vec::with_capacity(records.len());
    for record in records {
        let question = record.into_question()?;
        if !seen.insert(question.id()) {
            return Err(StorageError::DuplicateId(question.id()));
        }
        questions.push(question);
    }
    Ok(questions)
}

/// Read-only source of the question bank.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Load every question in stored order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read or fails validation.
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// Fixed in-memory bank for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct InMemoryQuestionBank {
    questions: Arc<Vec<Question>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(questions),
        }
    }
}

#[async_trait]
impl QuestionBank for InMemoryQuestionBank {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        if self.questions.is_empty() {
            return Err(StorageError::Empty);
        }
        Ok(self.questions.as_ref().clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} questions)", self.questions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, answer: &str) -> QuestionRecord {
        QuestionRecord {
            id,
            question: format!("Q{id}"),
            options: vec!["A. x".into(), "B. y".into()],
            answer: answer.into(),
            explanation: DEFAULT_EXPLANATION.into(),
            score: 1,
        }
    }

    #[test]
    fn record_round_trips_through_question() {
        let question = record(3, "b").into_question().unwrap();
        let back = QuestionRecord::from_question(&question);
        assert_eq!(back, record(3, "B"));
    }

    #[test]
    fn invalid_record_reports_its_id() {
        let err = record(9, "Q").into_question().unwrap_err();
        assert!(matches!(err, StorageError::Invalid { id, .. } if id == QuestionId::new(9)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = records_into_questions(vec![record(1, "A"), record(1, "B")]).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateId(id) if id == QuestionId::new(1)));
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(
            records_into_questions(Vec::new()),
            Err(StorageError::Empty)
        ));
    }

    #[tokio::test]
    async fn in_memory_bank_preserves_order() {
        let questions = records_into_questions(vec![record(2, "A"), record(1, "B")]).unwrap();
        let bank = InMemoryQuestionBank::new(questions.clone());
        assert_eq!(bank.load_questions().await.unwrap(), questions);
        assert!(matches!(
            InMemoryQuestionBank::default().load_questions().await,
            Err(StorageError::Empty)
        ));
    }
}
