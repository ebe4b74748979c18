#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{JsonQuestionBank, parse_bank};
pub use repository::{
    DEFAULT_EXPLANATION, InMemoryQuestionBank, QuestionBank, QuestionRecord, StorageError,
};
