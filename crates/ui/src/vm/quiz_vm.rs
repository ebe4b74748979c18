use quiz_core::model::{NextOutcome, QuizMode};
use services::{ConfirmRequest, QuizLoopService, QuizSessionService, SessionSnapshot};

use super::answer_sheet_vm::{AnswerSheetCellVm, map_answer_sheet};
use super::question_vm::{QuestionCardVm, map_question_card};
use super::result_vm::{ResultVm, map_result_page};
use crate::state::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(usize),
    Previous,
    Next,
    JumpTo(usize),
    Reveal,
    Submit,
    RequestMode(QuizMode),
    Restart,
    AutoFill,
    Confirm(bool),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    Continue,
    NeedsConfirmation(ConfirmRequest),
    Finished,
}

/// Drives one quiz attempt from user intents.
///
/// At most one confirmation is pending; while it is, every intent other than
/// [`QuizIntent::Confirm`] re-surfaces the same request.
pub struct QuizVm {
    quiz: QuizSessionService,
    pending: Option<ConfirmRequest>,
}

impl QuizVm {
    #[must_use]
    pub fn new(quiz: QuizSessionService) -> Self {
        Self {
            quiz,
            pending: None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizSessionService {
        &self.quiz
    }

    #[must_use]
    pub fn pending(&self) -> Option<&ConfirmRequest> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.quiz.snapshot()
    }

    #[must_use]
    pub fn question_card(&self) -> QuestionCardVm {
        map_question_card(&self.snapshot())
    }

    #[must_use]
    pub fn answer_sheet(&self) -> Vec<AnswerSheetCellVm> {
        map_answer_sheet(&self.snapshot())
    }

    #[must_use]
    pub fn result_page(&self) -> Option<ResultVm> {
        map_result_page(&self.snapshot())
    }

    /// # Errors
    ///
    /// Returns `ViewError::InvalidOption` for an unknown option index.
    /// Returns `ViewError::Unknown` for other service failures.
    pub fn apply(&mut self, intent: QuizIntent) -> Result<QuizOutcome, ViewError> {
        if let Some(request) = self.pending.clone() {
            return match intent {
                QuizIntent::Confirm(accepted) => self.confirm(accepted),
                _ => Ok(QuizOutcome::NeedsConfirmation(request)),
            };
        }

        let outcome = match intent {
            QuizIntent::Select(index) => {
                if self.selection_locked() {
                    return Ok(QuizOutcome::Continue);
                }
                self.quiz
                    .select_current(index)
                    .map_err(|err| ViewError::from(&err))?;
                QuizOutcome::Continue
            }
            QuizIntent::Previous => {
                self.quiz.go_to_previous();
                QuizOutcome::Continue
            }
            QuizIntent::Next => match self.quiz.go_to_next() {
                NextOutcome::Submitted => QuizOutcome::Finished,
                NextOutcome::Unanswered { count, first } => {
                    self.ask(ConfirmRequest::unanswered(count, first))
                }
                NextOutcome::Advanced | NextOutcome::Blocked => QuizOutcome::Continue,
            },
            QuizIntent::JumpTo(position) => {
                self.quiz.jump_to(position);
                QuizOutcome::Continue
            }
            QuizIntent::Reveal => {
                self.quiz.reveal_answer();
                QuizOutcome::Continue
            }
            QuizIntent::Submit => match self.quiz.submit().map(|_| ()) {
                Ok(_) => QuizOutcome::Finished,
                Err(err) => match err.unanswered() {
                    Some((count, first)) => self.ask(ConfirmRequest::unanswered(count, first)),
                    None => return Err(ViewError::from(&err)),
                },
            },
            QuizIntent::RequestMode(mode) => match self.quiz.request_mode_switch(mode) {
                Some(request) => self.ask(request),
                None => QuizOutcome::Continue,
            },
            // Leaving the results page discards nothing.
            QuizIntent::Restart if self.quiz.is_finished() => {
                self.quiz.start_new_quiz(None);
                QuizOutcome::Continue
            }
            QuizIntent::Restart => self.ask(ConfirmRequest::restart()),
            QuizIntent::AutoFill if self.quiz.is_finished() => QuizOutcome::Finished,
            QuizIntent::AutoFill => self.ask(ConfirmRequest::auto_fill()),
            QuizIntent::Confirm(_) => QuizOutcome::Continue,
        };
        Ok(outcome)
    }

    fn selection_locked(&self) -> bool {
        self.quiz.mode() == QuizMode::Practice && self.quiz.is_reveal_visible()
    }

    fn ask(&mut self, request: ConfirmRequest) -> QuizOutcome {
        self.pending = Some(request.clone());
        QuizOutcome::NeedsConfirmation(request)
    }

    fn confirm(&mut self, accepted: bool) -> Result<QuizOutcome, ViewError> {
        let Some(request) = self.pending.take() else {
            return Ok(QuizOutcome::Continue);
        };
        request
            .resolve(accepted, &mut self.quiz)
            .map_err(|err| ViewError::from(&err))?;
        if self.quiz.is_finished() {
            Ok(QuizOutcome::Finished)
        } else {
            Ok(QuizOutcome::Continue)
        }
    }
}

/// # Errors
///
/// Returns `ViewError::EmptyBank` when the bank has no questions.
/// Returns `ViewError::LoadFailed` when the bank cannot be read.
pub async fn start_quiz(quiz_loop: &QuizLoopService, mode: QuizMode) -> Result<QuizVm, ViewError> {
    let quiz = quiz_loop
        .start_quiz(mode)
        .await
        .map_err(|err| ViewError::from(&err))?;
    Ok(QuizVm::new(quiz))
}
