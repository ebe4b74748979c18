use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Session-wide quiz mode. Governs ordering, reveal and gating rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    /// Shuffled order, no feedback before submission.
    #[default]
    Exam,
    /// Bank order, per-question reveal.
    Practice,
}

impl QuizMode {
    /// Whether initialization shuffles the bank.
    #[must_use]
    pub fn shuffles(self) -> bool {
        matches!(self, QuizMode::Exam)
    }

    /// Whether answers may be revealed before submission.
    #[must_use]
    pub fn allows_reveal(self) -> bool {
        matches!(self, QuizMode::Practice)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Exam => "exam",
            QuizMode::Practice => "practice",
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    raw: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown quiz mode {:?} (expected exam or practice)", self.raw)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for QuizMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exam" => Ok(QuizMode::Exam),
            "practice" => Ok(QuizMode::Practice),
            _ => Err(ParseModeError { raw: s.to_owned() }),
        }
    }
}
