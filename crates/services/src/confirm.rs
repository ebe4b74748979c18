//! Confirmation requests for destructive quiz actions.
//!
//! The controller never blocks on the user. Callers build a [`ConfirmRequest`],
//! show it however they like, and hand the user's decision back to
//! [`ConfirmRequest::resolve`]. Cancelling simply drops the request.

use quiz_core::model::QuizMode;

use crate::error::SessionError;
use crate::sessions::QuizSessionService;

/// The operation a confirmation guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    SwitchMode(QuizMode),
    Restart,
    AutoFill,
    JumpToUnanswered(usize),
}

/// Title, descriptive content and the action to run on acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub body: Vec<String>,
    pub warning: Option<String>,
    pub confirm_text: String,
    pub cancel_text: String,
    pub action: PendingAction,
}

const PROGRESS_RESET_WARNING: &str =
    "Switching modes restarts the quiz; current progress will be discarded.";

impl ConfirmRequest {
    fn new(title: impl Into<String>, body: Vec<String>, action: PendingAction) -> Self {
        Self {
            title: title.into(),
            body,
            warning: None,
            confirm_text: "Confirm".to_owned(),
            cancel_text: "Cancel".to_owned(),
            action,
        }
    }

    fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    #[must_use]
    pub fn switch_mode(target: QuizMode) -> Self {
        let (title, lines) = match target {
            QuizMode::Exam => (
                "Switch to exam mode",
                [
                    "Correct answers and explanations stay hidden while answering.",
                    "Every question must be answered before submitting.",
                    "Questions are shuffled to simulate a real exam.",
                ],
            ),
            QuizMode::Practice => (
                "Switch to practice mode",
                [
                    "Correctness and explanation appear as soon as you pick an option.",
                    "You can reveal the answer at any time.",
                    "Questions follow the question bank order.",
                ],
            ),
        };
        Self::new(
            title,
            lines.iter().map(|l| (*l).to_owned()).collect(),
            PendingAction::SwitchMode(target),
        )
        .with_warning(PROGRESS_RESET_WARNING)
    }

    #[must_use]
    pub fn restart() -> Self {
        Self::new(
            "Start a new quiz",
            vec!["A fresh attempt starts in the current mode.".to_owned()],
            PendingAction::Restart,
        )
        .with_warning("Current answers will be discarded.")
    }

    #[must_use]
    pub fn auto_fill() -> Self {
        Self::new(
            "Auto-fill and submit",
            vec![
                "Every question gets a random answer and the quiz is submitted immediately."
                    .to_owned(),
                "Intended for checking the results page.".to_owned(),
            ],
            PendingAction::AutoFill,
        )
        .with_warning("Current answers will be discarded.")
    }

    /// Offer to jump to the first blank question after a refused submission.
    #[must_use]
    pub fn unanswered(count: usize, first: usize) -> Self {
        let mut request = Self::new(
            "Unanswered questions",
            vec![format!(
                "{count} question(s) are still unanswered. Go to question {}?",
                first + 1
            )],
            PendingAction::JumpToUnanswered(first),
        );
        request.confirm_text = "Go".to_owned();
        request
    }

    /// Apply the user's decision. Returns whether the action ran.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the guarded action (only auto-fill can fail).
    pub fn resolve(
        self,
        accepted: bool,
        quiz: &mut QuizSessionService,
    ) -> Result<bool, SessionError> {
        if !accepted {
            return Ok(false);
        }
        let ran = match self.action {
            PendingAction::SwitchMode(mode) => quiz.switch_mode(mode),
            PendingAction::Restart => {
                quiz.start_new_quiz(None);
                true
            }
            PendingAction::AutoFill => {
                quiz.auto_fill_random()?;
                true
            }
            PendingAction::JumpToUnanswered(position) => quiz.jump_to(position),
        };
        Ok(ran)
    }
}
