//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SessionStateError;
use storage::StorageError;

/// Errors emitted by the quiz session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question bank has no questions")]
    EmptyBank,
    #[error("option {index} does not exist on the current question")]
    OptionOutOfRange { index: usize },
    #[error(transparent)]
    State(#[from] SessionStateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Blank-question details when a submission was refused.
    #[must_use]
    pub fn unanswered(&self) -> Option<(usize, usize)> {
        match self {
            SessionError::State(SessionStateError::Unanswered { count, first }) => {
                Some((*count, *first))
            }
            _ => None,
        }
    }
}
