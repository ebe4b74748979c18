use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::question::{Question, answer_letter};

/// Percentage at or above which an attempt counts as passed.
pub const PASS_PERCENTAGE: u32 = 60;

/// A question answered incorrectly or left blank, compiled for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongAnswer {
    pub position: usize,
    pub question: Question,
    /// `None` when the question was never answered.
    pub selected_letter: Option<char>,
}

impl WrongAnswer {
    #[must_use]
    pub fn is_unanswered(&self) -> bool {
        self.selected_letter.is_none()
    }
}

/// Graded outcome of a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    score: u64,
    total_possible: u64,
    correct_count: usize,
    wrong_answers: Vec<WrongAnswer>,
    percentage: u32,
}

impl QuizResult {
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn total_possible(&self) -> u64 {
        self.total_possible
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// Wrong and unanswered questions, in question order.
    #[must_use]
    pub fn wrong_answers(&self) -> &[WrongAnswer] {
        &self.wrong_answers
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.wrong_answers
            .iter()
            .filter(|w| w.is_unanswered())
            .count()
    }

    /// `round(score / total_possible * 100)`, half rounding up; 0 for a zero total.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.percentage >= PASS_PERCENTAGE
    }
}

/// Grade an answer map against the ordered questions.
///
/// Positions missing from `answers` are recorded as wrong with no selected
/// letter. Pure: the same inputs always produce the same result.
#[must_use]
pub fn grade(questions: &[Question], answers: &BTreeMap<usize, String>) -> QuizResult {
    let mut score = 0_u64;
    let mut total_possible = 0_u64;
    let mut correct_count = 0_usize;
    let mut wrong_answers = Vec::new();

    for (position, question) in questions.iter().enumerate() {
        total_possible += u64::from(question.points());

        let selected_letter = answers.get(&position).and_then(|a| answer_letter(a));
        match selected_letter {
            Some(letter) if question.is_correct_letter(letter) => {
                score += u64::from(question.points());
                correct_count += 1;
            }
            selected_letter => wrong_answers.push(WrongAnswer {
                position,
                question: question.clone(),
                selected_letter,
            }),
        }
    }

    QuizResult {
        score,
        total_possible,
        correct_count,
        wrong_answers,
        percentage: rounded_percentage(score, total_possible),
    }
}

fn rounded_percentage(score: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = (score.saturating_mul(200) + total) / total.saturating_mul(2);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn question(id: u64, correct: &str, points: u32) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["A. one".into(), "B. two".into(), "C. three".into()],
            correct,
            points,
            "",
        )
        .unwrap()
    }

    fn answers(pairs: &[(usize, &str)]) -> BTreeMap<usize, String> {
        pairs.iter().map(|(p, a)| (*p, (*a).to_string())).collect()
    }

    #[test]
    fn one_right_one_wrong() {
        let questions = vec![question(1, "A", 10), question(2, "B", 20)];
        let result = grade(&questions, &answers(&[(0, "A. one"), (1, "C. three")]));

        assert_eq!(result.score(), 10);
        assert_eq!(result.total_possible(), 30);
        assert_eq!(result.correct_count(), 1);
        assert_eq!(result.percentage(), 33);
        assert!(!result.passed());
        assert_eq!(result.wrong_answers().len(), 1);
        assert_eq!(result.wrong_answers()[0].position, 1);
        assert_eq!(result.wrong_answers()[0].question.id(), QuestionId::new(2));
        assert_eq!(result.wrong_answers()[0].selected_letter, Some('C'));
    }

    #[test]
    fn missing_answers_are_wrong_without_letter() {
        let questions = vec![question(1, "A", 1), question(2, "B", 1)];
        let result = grade(&questions, &answers(&[(0, "A. one")]));

        assert_eq!(result.score(), 1);
        assert_eq!(result.unanswered_count(), 1);
        assert!(result.wrong_answers()[0].is_unanswered());
        assert_eq!(result.percentage(), 50);
    }

    #[test]
    fn letter_comparison_ignores_case() {
        let questions = vec![question(1, "b", 4)];
        let result = grade(&questions, &answers(&[(0, "b. two")]));
        assert_eq!(result.score(), 4);
        assert!(result.wrong_answers().is_empty());
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(0, 5), 0);
        assert_eq!(rounded_percentage(5, 5), 100);
        assert_eq!(rounded_percentage(0, 0), 0);
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        let questions: Vec<_> = (1..=5).map(|i| question(i, "A", 1)).collect();
        let result = grade(
            &questions,
            &answers(&[(0, "A. one"), (1, "A. one"), (2, "A. one"), (3, "B. two")]),
        );
        assert_eq!(result.percentage(), 60);
        assert!(result.passed());
    }

    #[test]
    fn grading_is_deterministic_and_partitions_questions() {
        let questions: Vec<_> = (0..12)
            .map(|i| question(i, ["A", "B", "C"][(i % 3) as usize], (i as u32) + 1))
            .collect();
        let picks = ["A. one", "B. two", "C. three"];
        let map: BTreeMap<usize, String> = (0..12)
            .map(|i| (i, picks[(i * 7) % 3].to_string()))
            .collect();

        let first = grade(&questions, &map);
        let second = grade(&questions, &map);
        assert_eq!(first, second);
        assert_eq!(
            first.wrong_answers().len() + first.correct_count(),
            questions.len()
        );

        let expected: u64 = questions
            .iter()
            .enumerate()
            .filter(|(i, q)| q.is_correct_letter(picks[(i * 7) % 3].chars().next().unwrap()))
            .map(|(_, q)| u64::from(q.points()))
            .sum();
        assert_eq!(first.score(), expected);
    }
}
