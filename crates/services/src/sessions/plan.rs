use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, QuizMode};

/// Ordered question set for a new attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    pub shuffled: bool,
}

impl SessionPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }
}

/// Applies the ordering policy of a mode to the bank.
///
/// - `Exam` shuffles the whole bank (Fisher–Yates, every permutation equally likely).
/// - `Practice` keeps the stored bank order.
pub struct SessionBuilder<'a> {
    bank: &'a [Question],
    mode: QuizMode,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a [Question]) -> Self {
        Self {
            bank,
            mode: QuizMode::default(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: QuizMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> SessionPlan {
        let mut questions = self.bank.to_vec();
        let shuffled = self.mode.shuffles();
        if shuffled {
            questions.as_mut_slice().shuffle(rng);
        }
        SessionPlan {
            questions,
            shuffled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn bank(n: u64) -> Vec<Question> {
        (1..=n)
            .map(|i| {
                Question::new(
                    QuestionId::new(i),
                    format!("Q{i}"),
                    vec!["A. x".into(), "B. y".into()],
                    "A",
                    1,
                    "",
                )
                .unwrap()
            })
            .collect()
    }

    fn ids(questions: &[Question]) -> Vec<u64> {
        questions.iter().map(|q| q.id().value()).collect()
    }

    #[test]
    fn practice_keeps_bank_order() {
        let bank = bank(20);
        let mut rng = StdRng::seed_from_u64(7);
        let plan = SessionBuilder::new(&bank)
            .with_mode(QuizMode::Practice)
            .build(&mut rng);
        assert!(!plan.shuffled);
        assert_eq!(plan.questions, bank);
    }

    #[test]
    fn exam_produces_a_permutation() {
        let bank = bank(30);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = SessionBuilder::new(&bank)
                .with_mode(QuizMode::Exam)
                .build(&mut rng);
            assert!(plan.shuffled);
            assert_eq!(plan.total(), bank.len());

            let mut got = ids(&plan.questions);
            got.sort_unstable();
            assert_eq!(got, ids(&bank));
        }
    }

    #[test]
    fn exam_shuffle_is_roughly_uniform_over_small_bank() {
        let bank = bank(3);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<Vec<u64>, usize> = HashMap::new();
        let trials = 6_000;
        for _ in 0..trials {
            let plan = SessionBuilder::new(&bank).build(&mut rng);
            *counts.entry(ids(&plan.questions)).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        for count in counts.values() {
            // Expected 1000 per ordering; allow generous slack.
            assert!((800..=1200).contains(count), "skewed count {count}");
        }
    }
}
