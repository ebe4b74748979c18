mod ids;
mod mode;
mod question;
mod result;
mod session;

pub use ids::{ParseIdError, QuestionId, SessionId};
pub use mode::{ParseModeError, QuizMode};
pub use question::{
    MAX_OPTIONS, Question, QuestionError, answer_letter, label_index, option_body, option_label,
};
pub use result::{PASS_PERCENTAGE, QuizResult, WrongAnswer, grade};
pub use session::{NextOutcome, Session, SessionStateError};
