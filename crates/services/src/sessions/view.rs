use chrono::{DateTime, Utc};

use quiz_core::model::{Question, QuizMode, QuizResult, Session, SessionId};

/// Owned snapshot of a session handed to the presentation layer after every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub mode: QuizMode,
    pub position: usize,
    pub total: usize,
    pub question: Question,
    pub selected_option: Option<String>,
    pub revealed: bool,
    pub reveal_visible: bool,
    pub can_advance: bool,
    pub is_last: bool,
    pub answered: Vec<bool>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub result: Option<QuizResult>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.id(),
            mode: session.mode(),
            position: session.current_position(),
            total: session.len(),
            question: session.current_question().clone(),
            selected_option: session.selected_option().map(str::to_owned),
            revealed: session.revealed(),
            reveal_visible: session.is_reveal_visible(),
            can_advance: session.can_advance(),
            is_last: session.is_last(),
            answered: (0..session.len()).map(|p| session.is_answered(p)).collect(),
            started_at: session.started_at(),
            finished_at: session.finished_at(),
            result: session.result().cloned(),
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answered.iter().filter(|a| **a).count()
    }
}
