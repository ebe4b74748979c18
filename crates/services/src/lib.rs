#![forbid(unsafe_code)]

pub mod confirm;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use confirm::{ConfirmRequest, PendingAction};
pub use error::SessionError;
pub use sessions::{
    QuizLoopService, QuizSessionService, SessionBuilder, SessionPlan, SessionProgress,
    SessionSnapshot,
};
