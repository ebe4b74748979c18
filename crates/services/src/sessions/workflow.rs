use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Question, QuizMode};
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::QuestionBank;
use tracing::info;

use super::service::QuizSessionService;
use crate::error::SessionError;

/// Loads the question bank once and hands out session controllers.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<dyn QuestionBank>,
    seed: Option<u64>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn QuestionBank>) -> Self {
        Self {
            clock,
            bank,
            seed: None,
        }
    }

    /// Fix the random seed so exam order and auto-fill are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Read and validate the whole bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the source cannot be read or is invalid.
    pub async fn load_bank(&self) -> Result<Vec<Question>, SessionError> {
        Ok(self.bank.load_questions().await?)
    }

    /// Load the bank and start the first attempt in `mode`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` for loading failures and
    /// `SessionError::EmptyBank` if nothing was loaded.
    pub async fn start_quiz(&self, mode: QuizMode) -> Result<QuizSessionService, SessionError> {
        let questions = self.load_bank().await?;
        info!(source = %self.bank.describe(), %mode, seeded = self.seed.is_some(), "starting quiz");
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        QuizSessionService::new(questions, mode, self.clock, rng)
    }
}
