use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use quiz_core::Clock;
use quiz_core::model::{NextOutcome, Question, QuizMode, QuizResult, Session, SessionId};

use super::plan::SessionBuilder;
use super::progress::SessionProgress;
use super::view::SessionSnapshot;
use crate::confirm::ConfirmRequest;
use crate::error::SessionError;

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Session controller: owns the bank, the live `Session` and the randomness
/// used for exam ordering and auto-fill.
///
/// Every operation runs to completion synchronously. Destructive operations
/// (`switch_mode`, `start_new_quiz`, `auto_fill_random`) do not ask for
/// confirmation themselves; callers gate them behind a [`ConfirmRequest`].
pub struct QuizSessionService {
    bank: Arc<[Question]>,
    session: Session,
    clock: Clock,
    rng: StdRng,
}

impl QuizSessionService {
    /// Build a controller and start the first attempt in `mode`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if `bank` is empty.
    pub fn new(
        bank: Vec<Question>,
        mode: QuizMode,
        clock: Clock,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        if bank.is_empty() {
            return Err(SessionError::EmptyBank);
        }
        let bank: Arc<[Question]> = bank.into();
        let session = Self::build_session(&bank, mode, clock, &mut rng)?;
        Ok(Self {
            bank,
            session,
            clock,
            rng,
        })
    }

    /// Controller seeded from the operating system.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if `bank` is empty.
    pub fn with_entropy(bank: Vec<Question>, mode: QuizMode) -> Result<Self, SessionError> {
        Self::new(bank, mode, Clock::default(), StdRng::from_os_rng())
    }

    /// Controller with reproducible shuffles and auto-fill.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if `bank` is empty.
    pub fn with_seed(bank: Vec<Question>, mode: QuizMode, seed: u64) -> Result<Self, SessionError> {
        Self::new(bank, mode, Clock::default(), StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn build_session(
        bank: &[Question],
        mode: QuizMode,
        clock: Clock,
        rng: &mut StdRng,
    ) -> Result<Session, SessionError> {
        let plan = SessionBuilder::new(bank).with_mode(mode).build(rng);
        let session = Session::new(mode, plan.questions, clock.now())?;
        info!(
            session = %session.id(),
            %mode,
            questions = session.len(),
            shuffled = plan.shuffled,
            "quiz session started"
        );
        Ok(session)
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn bank(&self) -> &[Question] {
        &self.bank
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.session.mode()
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.session.result()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn is_reveal_visible(&self) -> bool {
        self.session.is_reveal_visible()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_session(&self.session)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.session.len();
        let answered = self.session.answers().len();
        SessionProgress {
            total,
            answered,
            unanswered: total - answered,
            position: self.session.current_position(),
            is_last: self.session.is_last(),
            is_complete: self.session.is_finished(),
        }
    }

    //
    // ─── LIFECYCLE ─────────────────────────────────────────────────────────────
    //

    /// Discard the current attempt and start a fresh one.
    ///
    /// `None` keeps the current mode. The new order follows that mode's policy.
    pub fn start_new_quiz(&mut self, mode: Option<QuizMode>) -> &Session {
        let mode = mode.unwrap_or_else(|| self.session.mode());
        // Cannot fail: the bank was checked non-empty at construction.
        match Self::build_session(&self.bank, mode, self.clock, &mut self.rng) {
            Ok(session) => self.session = session,
            Err(err) => warn!(%err, "failed to restart quiz session"),
        }
        &self.session
    }

    /// Restart in another mode. Returns `false` when `mode` is already active.
    pub fn switch_mode(&mut self, mode: QuizMode) -> bool {
        if mode == self.session.mode() {
            return false;
        }
        info!(from = %self.session.mode(), to = %mode, "switching quiz mode");
        self.start_new_quiz(Some(mode));
        true
    }

    /// Confirmation to show before [`switch_mode`](Self::switch_mode); `None` if nothing would change.
    #[must_use]
    pub fn request_mode_switch(&self, mode: QuizMode) -> Option<ConfirmRequest> {
        (mode != self.session.mode()).then(|| ConfirmRequest::switch_mode(mode))
    }

    //
    // ─── ANSWERS & NAVIGATION ──────────────────────────────────────────────────
    //

    /// Record `option` as the answer at `position`, overwriting any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::State` if the session is finished or `position` is invalid.
    pub fn select_option(
        &mut self,
        position: usize,
        option: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.session.record_answer(position, option)?;
        Ok(())
    }

    /// Select the option at `index` of the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OptionOutOfRange` for an unknown option, or the
    /// errors of [`select_option`](Self::select_option).
    pub fn select_current(&mut self, index: usize) -> Result<(), SessionError> {
        let option = self
            .session
            .current_question()
            .option(index)
            .ok_or(SessionError::OptionOutOfRange { index })?
            .to_owned();
        let position = self.session.current_position();
        self.select_option(position, option)
    }

    pub fn go_to_previous(&mut self) -> bool {
        self.session.go_to_previous()
    }

    /// Advance, or attempt submission from the last question.
    pub fn go_to_next(&mut self) -> NextOutcome {
        let outcome = self.session.go_to_next(self.clock.now());
        match outcome {
            NextOutcome::Blocked => {
                debug!(
                    position = self.session.current_position(),
                    "advance blocked by gate"
                );
            }
            NextOutcome::Unanswered { count, first } => {
                warn!(count, first, "submission refused: unanswered questions");
            }
            NextOutcome::Submitted => {
                if let Some(result) = self.session.result() {
                    log_finished(self.session.id(), result);
                }
            }
            NextOutcome::Advanced => {}
        }
        outcome
    }

    pub fn jump_to(&mut self, position: usize) -> bool {
        self.session.jump_to(position)
    }

    /// Practice-mode reveal of the current answer.
    pub fn reveal_answer(&mut self) -> bool {
        self.session.reveal()
    }

    //
    // ─── GRADING ───────────────────────────────────────────────────────────────
    //

    /// Grade the attempt if every question is answered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::State(SessionStateError::Unanswered { .. })` with the
    /// blank count and first blank position; the session stays open.
    pub fn submit(&mut self) -> Result<&QuizResult, SessionError> {
        let id = self.session.id();
        let was_finished = self.session.is_finished();
        match self.session.submit(self.clock.now()) {
            Ok(result) => {
                if !was_finished {
                    log_finished(id, result);
                }
                Ok(result)
            }
            Err(err) => {
                warn!(%err, "submission refused");
                Err(err.into())
            }
        }
    }

    /// Grade the attempt as it stands; blanks count as wrong.
    pub fn force_submit(&mut self) -> &QuizResult {
        let id = self.session.id();
        let was_finished = self.session.is_finished();
        let result = self.session.force_submit(self.clock.now());
        if !was_finished {
            log_finished(id, result);
        }
        result
    }

    /// Diagnostic aid: answer every question with a uniformly random option and grade.
    ///
    /// Discards the answers recorded so far.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::State` if the session is already finished.
    pub fn auto_fill_random(&mut self) -> Result<&QuizResult, SessionError> {
        let answers: BTreeMap<usize, String> = self
            .session
            .questions()
            .iter()
            .enumerate()
            .filter_map(|(position, question)| {
                let options = question.options();
                let pick = self.rng.random_range(0..options.len());
                options.get(pick).map(|opt| (position, opt.clone()))
            })
            .collect();

        let id = self.session.id();
        info!(session = %id, "auto-filling answers");
        let result = self.session.finish_with_answers(answers, self.clock.now())?;
        log_finished(id, result);
        Ok(result)
    }
}

fn log_finished(id: SessionId, result: &QuizResult) {
    info!(
        session = %id,
        score = result.score(),
        total = result.total_possible(),
        percentage = result.percentage(),
        wrong = result.wrong_answers().len(),
        "quiz session finished"
    );
}

impl fmt::Debug for QuizSessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSessionService")
            .field("bank_len", &self.bank.len())
            .field("session", &self.session.id())
            .field("mode", &self.session.mode())
            .field("position", &self.session.current_position())
            .field("answered", &self.session.answers().len())
            .field("finished", &self.session.is_finished())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
