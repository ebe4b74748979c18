use std::sync::Arc;

use quiz_core::model::QuizMode;
use services::QuizLoopService;

pub trait UiApp: Send + Sync {
    fn initial_mode(&self) -> QuizMode;
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
}

#[derive(Clone)]
pub struct AppContext {
    initial_mode: QuizMode,
    quiz_loop: Arc<QuizLoopService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            initial_mode: app.initial_mode(),
            quiz_loop: app.quiz_loop(),
        }
    }

    #[must_use]
    pub fn initial_mode(&self) -> QuizMode {
        self.initial_mode
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
