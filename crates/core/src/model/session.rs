use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::ids::SessionId;
use crate::model::mode::QuizMode;
use crate::model::question::Question;
use crate::model::result::{QuizResult, grade};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("a session needs at least one question")]
    NoQuestions,

    #[error("session already finished")]
    Finished,

    #[error("position {position} is out of range for {len} questions")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("{count} question(s) unanswered, first at position {first}")]
    Unanswered { count: usize, first: usize },

    #[error("inconsistent session record: {0}")]
    Inconsistent(&'static str),
}

/// What a forward step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    /// Moved to the following question.
    Advanced,
    /// Gate not satisfied or session finished; nothing changed.
    Blocked,
    /// Last question passed the gate and the attempt was graded.
    Submitted,
    /// Last question passed the gate but earlier questions are still blank.
    Unanswered { count: usize, first: usize },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State of one quiz attempt.
///
/// The question order is fixed at construction. `result` is present exactly
/// when the attempt is finished, and a finished session rejects every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord", into = "SessionRecord")]
pub struct Session {
    id: SessionId,
    mode: QuizMode,
    questions: Vec<Question>,
    current: usize,
    answers: BTreeMap<usize, String>,
    revealed: bool,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    result: Option<QuizResult>,
}

impl Session {
    /// Start an attempt over already-ordered questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::NoQuestions` for an empty question list.
    pub fn new(
        mode: QuizMode,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionStateError> {
        if questions.is_empty() {
            return Err(SessionStateError::NoQuestions);
        }
        Ok(Self {
            id: SessionId::new_random(),
            mode,
            questions,
            current: 0,
            answers: BTreeMap::new(),
            revealed: false,
            started_at,
            finished_at: None,
            result: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed session; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, position: usize) -> Option<&str> {
        self.answers.get(&position).map(String::as_str)
    }

    /// Option recorded for the current question.
    #[must_use]
    pub fn selected_option(&self) -> Option<&str> {
        self.answer(self.current)
    }

    #[must_use]
    pub fn is_answered(&self, position: usize) -> bool {
        self.answers.contains_key(&position)
    }

    #[must_use]
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Whether correctness feedback is shown for the current question.
    #[must_use]
    pub fn is_reveal_visible(&self) -> bool {
        self.mode.allows_reveal() && (self.selected_option().is_some() || self.revealed)
    }

    /// Whether the forward gate is satisfied for the current question.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        if self.is_finished() {
            return false;
        }
        match self.mode {
            QuizMode::Exam => self.selected_option().is_some(),
            QuizMode::Practice => self.selected_option().is_some() || self.revealed,
        }
    }

    /// Positions without a recorded answer, ascending.
    #[must_use]
    pub fn unanswered_positions(&self) -> Vec<usize> {
        (0..self.questions.len())
            .filter(|p| !self.answers.contains_key(p))
            .collect()
    }

    /// Record (or overwrite) the answer at `position`. Leaves the reveal flag alone.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::Finished` once graded, or
    /// `SessionStateError::PositionOutOfRange` for an invalid position.
    pub fn record_answer(
        &mut self,
        position: usize,
        option: impl Into<String>,
    ) -> Result<(), SessionStateError> {
        if self.is_finished() {
            return Err(SessionStateError::Finished);
        }
        self.check_position(position)?;
        self.answers.insert(position, option.into());
        Ok(())
    }

    pub fn go_to_previous(&mut self) -> bool {
        if self.is_finished() || self.current == 0 {
            return false;
        }
        self.move_to(self.current - 1);
        true
    }

    /// Advance past the current question, or attempt submission on the last one.
    pub fn go_to_next(&mut self, now: DateTime<Utc>) -> NextOutcome {
        if !self.can_advance() {
            return NextOutcome::Blocked;
        }
        if !self.is_last() {
            self.move_to(self.current + 1);
            return NextOutcome::Advanced;
        }
        match self.submit(now) {
            Ok(_) => NextOutcome::Submitted,
            Err(SessionStateError::Unanswered { count, first }) => {
                NextOutcome::Unanswered { count, first }
            }
            Err(_) => NextOutcome::Blocked,
        }
    }

    /// Move anywhere without gating. Out-of-range positions are ignored.
    pub fn jump_to(&mut self, position: usize) -> bool {
        if self.is_finished() || position >= self.questions.len() {
            return false;
        }
        self.move_to(position);
        true
    }

    /// Practice-mode peek at the current answer. Returns whether the flag changed.
    pub fn reveal(&mut self) -> bool {
        if self.is_finished()
            || !self.mode.allows_reveal()
            || self.revealed
            || self.selected_option().is_some()
        {
            return false;
        }
        self.revealed = true;
        true
    }

    /// Grade the attempt once every question has an answer.
    ///
    /// Submitting an already finished session returns the existing result.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::Unanswered` with the count and first blank position.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<&QuizResult, SessionStateError> {
        if !self.is_finished() {
            let unanswered = self.unanswered_positions();
            if let Some(&first) = unanswered.first() {
                return Err(SessionStateError::Unanswered {
                    count: unanswered.len(),
                    first,
                });
            }
        }
        Ok(self.force_submit(now))
    }

    /// Grade the attempt as it stands; blanks count as wrong.
    pub fn force_submit(&mut self, now: DateTime<Utc>) -> &QuizResult {
        if self.result.is_none() {
            self.finished_at = Some(now);
            self.revealed = false;
        }
        self.result
            .get_or_insert_with(|| grade(&self.questions, &self.answers))
    }

    /// Replace every answer and grade immediately, bypassing the blank check.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::Finished` once graded, or
    /// `SessionStateError::PositionOutOfRange` if any key is invalid.
    pub fn finish_with_answers(
        &mut self,
        answers: BTreeMap<usize, String>,
        now: DateTime<Utc>,
    ) -> Result<&QuizResult, SessionStateError> {
        if self.is_finished() {
            return Err(SessionStateError::Finished);
        }
        if let Some((&position, _)) = answers.last_key_value() {
            self.check_position(position)?;
        }
        self.answers = answers;
        Ok(self.force_submit(now))
    }

    fn move_to(&mut self, position: usize) {
        self.current = position;
        self.revealed = false;
    }

    fn check_position(&self, position: usize) -> Result<(), SessionStateError> {
        if position < self.questions.len() {
            Ok(())
        } else {
            Err(SessionStateError::PositionOutOfRange {
                position,
                len: self.questions.len(),
            })
        }
    }
}

/// Serialized form of `Session`; invariants are re-checked on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    id: SessionId,
    mode: QuizMode,
    ordered_questions: Vec<Question>,
    current_position: usize,
    answers: BTreeMap<usize, String>,
    revealed: bool,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    result: Option<QuizResult>,
}

impl TryFrom<SessionRecord> for Session {
    type Error = SessionStateError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        let len = record.ordered_questions.len();
        if len == 0 {
            return Err(SessionStateError::NoQuestions);
        }
        if record.current_position >= len {
            return Err(SessionStateError::PositionOutOfRange {
                position: record.current_position,
                len,
            });
        }
        if let Some((&position, _)) = record.answers.last_key_value() {
            if position >= len {
                return Err(SessionStateError::PositionOutOfRange { position, len });
            }
        }
        if record.result.is_some() != record.finished_at.is_some() {
            return Err(SessionStateError::Inconsistent(
                "result and finished_at must be set together",
            ));
        }

        Ok(Self {
            id: record.id,
            mode: record.mode,
            questions: record.ordered_questions,
            current: record.current_position,
            answers: record.answers,
            revealed: record.revealed,
            started_at: record.started_at,
            finished_at: record.finished_at,
            result: record.result,
        })
    }
}

impl From<Session> for SessionRecord {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            mode: session.mode,
            ordered_questions: session.questions,
            current_position: session.current,
            answers: session.answers,
            revealed: session.revealed,
            started_at: session.started_at,
            finished_at: session.finished_at,
            result: session.result,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
