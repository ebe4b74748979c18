use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Highest number of options a question may carry (labels `A`..=`Z`).
pub const MAX_OPTIONS: usize = 26;

//
// ─── LABELS ────────────────────────────────────────────────────────────────────
//

/// Positional label for the option at `index` (`0 → 'A'`, `1 → 'B'`, …).
#[must_use]
pub fn option_label(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|i| usize::from(*i) < MAX_OPTIONS)
        .map(|i| char::from(b'A' + i))
}

/// Inverse of [`option_label`]; accepts lowercase letters.
#[must_use]
pub fn label_index(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some(usize::from(upper as u8 - b'A'))
    } else {
        None
    }
}

/// The letter a recorded answer stands for: its first non-blank character.
#[must_use]
pub fn answer_letter(answer: &str) -> Option<char> {
    answer.trim_start().chars().next()
}

/// Option text with the leading label and its separator removed (`"A. x"` → `"x"`).
#[must_use]
pub fn option_body(option: &str) -> &str {
    let mut chars = option.chars();
    if chars.next().is_none() {
        return option;
    }
    chars
        .as_str()
        .trim_start_matches(['.', ':', ')', '、', '．'])
        .trim_start()
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question has no options")]
    NoOptions,

    #[error("question has {count} options, at most 26 are supported")]
    TooManyOptions { count: usize },

    #[error("option {index} should start with label {expected}: {option:?}")]
    LabelMismatch {
        index: usize,
        expected: char,
        option: String,
    },

    #[error("correct answer {raw:?} is not a single letter")]
    InvalidCorrectLetter { raw: String },

    #[error("correct answer {letter} does not match any of the {options} options")]
    CorrectLetterOutOfRange { letter: char, options: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single-choice question as stored in the bank.
///
/// Option labels are derived from position, never from the option text; the
/// constructor only checks that the text agrees with that derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionParts", into = "QuestionParts")]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_letter: char,
    points: u32,
    explanation: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// `correct_letter` is trimmed and compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when options are empty or mislabelled, or when the
    /// correct letter does not name one of the options.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_letter: &str,
        points: u32,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if options.len() > MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions {
                count: options.len(),
            });
        }

        for (index, option) in options.iter().enumerate() {
            let expected = option_label(index).ok_or(QuestionError::TooManyOptions {
                count: options.len(),
            })?;
            let embedded = answer_letter(option).map(|c| c.to_ascii_uppercase());
            if embedded != Some(expected) {
                return Err(QuestionError::LabelMismatch {
                    index,
                    expected,
                    option: option.clone(),
                });
            }
        }

        let mut letters = correct_letter.trim().chars();
        let letter = match (letters.next(), letters.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => {
                return Err(QuestionError::InvalidCorrectLetter {
                    raw: correct_letter.to_owned(),
                });
            }
        };
        if label_index(letter).is_none_or(|i| i >= options.len()) {
            return Err(QuestionError::CorrectLetterOutOfRange {
                letter,
                options: options.len(),
            });
        }

        Ok(Self {
            id,
            text: text.into(),
            options,
            correct_letter: letter,
            points,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    /// Options paired with their positional labels.
    pub fn labelled_options(&self) -> impl Iterator<Item = (char, &str)> {
        self.options
            .iter()
            .enumerate()
            .filter_map(|(i, opt)| option_label(i).map(|label| (label, opt.as_str())))
    }

    #[must_use]
    pub fn correct_letter(&self) -> char {
        self.correct_letter
    }

    /// Index of the correct option; always in range for a constructed question.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        label_index(self.correct_letter).unwrap_or(0)
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        self.option(self.correct_index()).unwrap_or_default()
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Case-insensitive comparison of a selected letter against the answer key.
    #[must_use]
    pub fn is_correct_letter(&self, letter: char) -> bool {
        letter.to_ascii_uppercase() == self.correct_letter
    }
}

/// Unvalidated wire shape used for (de)serializing `Question`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionParts {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_letter: String,
    points: u32,
    explanation: String,
}

impl TryFrom<QuestionParts> for Question {
    type Error = QuestionError;

    fn try_from(parts: QuestionParts) -> Result<Self, Self::Error> {
        Question::new(
            parts.id,
            parts.text,
            parts.options,
            &parts.correct_letter,
            parts.points,
            parts.explanation,
        )
    }
}

impl From<Question> for QuestionParts {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            options: q.options,
            correct_letter: q.correct_letter.to_string(),
            points: q.points,
            explanation: q.explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn labels_follow_position() {
        assert_eq!(option_label(0), Some('A'));
        assert_eq!(option_label(3), Some('D'));
        assert_eq!(option_label(25), Some('Z'));
        assert_eq!(option_label(26), None);
        assert_eq!(label_index('c'), Some(2));
        assert_eq!(label_index('?'), None);
    }

    #[test]
    fn option_body_strips_label_and_separator() {
        assert_eq!(option_body("A. Paris"), "Paris");
        assert_eq!(option_body("B、上海"), "上海");
        assert_eq!(option_body("C)  spaced"), "spaced");
        assert_eq!(option_body(""), "");
    }

    #[test]
    fn correct_letter_is_trimmed_and_uppercased() {
        let q = Question::new(
            QuestionId::new(1),
            "Pick",
            opts(&["A. x", "B. y"]),
            " b ",
            5,
            "because",
        )
        .unwrap();

        assert_eq!(q.correct_letter(), 'B');
        assert_eq!(q.correct_index(), 1);
        assert_eq!(q.correct_option(), "B. y");
        assert!(q.is_correct_letter('b'));
        assert!(!q.is_correct_letter('A'));
    }

    #[test]
    fn rejects_empty_options() {
        let err = Question::new(QuestionId::new(1), "Q", Vec::new(), "A", 1, "").unwrap_err();
        assert_eq!(err, QuestionError::NoOptions);
    }

    #[test]
    fn rejects_label_out_of_order() {
        let err = Question::new(
            QuestionId::new(1),
            "Q",
            opts(&["A. x", "C. y"]),
            "A",
            1,
            "",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            QuestionError::LabelMismatch {
                index: 1,
                expected: 'B',
                ..
            }
        ));
    }

    #[test]
    fn rejects_correct_letter_beyond_options() {
        let err = Question::new(
            QuestionId::new(1),
            "Q",
            opts(&["A. x", "B. y"]),
            "D",
            1,
            "",
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectLetterOutOfRange {
                letter: 'D',
                options: 2
            }
        );
    }

    #[test]
    fn rejects_multi_letter_answer() {
        let err = Question::new(QuestionId::new(1), "Q", opts(&["A. x"]), "AB", 1, "").unwrap_err();
        assert!(matches!(err, QuestionError::InvalidCorrectLetter { .. }));
    }

    #[test]
    fn deserialization_revalidates() {
        let json = r#"{"id":7,"text":"Q","options":["A. x","B. y"],"correctLetter":"Z","points":1,"explanation":""}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());

        let ok = r#"{"id":7,"text":"Q","options":["A. x","B. y"],"correctLetter":"b","points":3,"explanation":"e"}"#;
        let q: Question = serde_json::from_str(ok).unwrap();
        assert_eq!(q.id(), QuestionId::new(7));
        assert_eq!(q.correct_letter(), 'B');
        assert_eq!(q.points(), 3);
    }
}
