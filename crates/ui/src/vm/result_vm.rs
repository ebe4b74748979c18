use quiz_core::model::{PASS_PERCENTAGE, QuizResult, WrongAnswer, option_body, option_label};
use services::SessionSnapshot;

use super::question_vm::{OptionState, OptionVm, mode_label};
use super::time_fmt::format_elapsed;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrongItemVm {
    pub number: usize,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub your_answer: String,
    pub correct_answer: String,
    pub explanation: String,
}

/// Summary page shown once the attempt is graded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub mode_label: &'static str,
    pub score_label: String,
    pub percentage_label: String,
    pub correct_label: String,
    pub verdict: &'static str,
    pub passed: bool,
    pub time_taken: Option<String>,
    pub wrong: Vec<WrongItemVm>,
}

fn map_wrong_item(item: &WrongAnswer) -> WrongItemVm {
    let question = &item.question;
    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let label = option_label(index).unwrap_or('?');
            let picked = item
                .selected_letter
                .is_some_and(|l| l.eq_ignore_ascii_case(&label));
            let state = if question.is_correct_letter(label) {
                OptionState::Correct
            } else if picked {
                OptionState::WrongPick
            } else {
                OptionState::Dimmed
            };
            OptionVm {
                index,
                label,
                text: text.clone(),
                body: option_body(text).to_owned(),
                state,
                selectable: false,
            }
        })
        .collect();

    let your_answer = match item.selected_letter {
        Some(letter) => format!("Your answer: {}", letter.to_ascii_uppercase()),
        None => "Not answered".to_owned(),
    };

    WrongItemVm {
        number: item.position + 1,
        prompt: question.text().to_owned(),
        options,
        your_answer,
        correct_answer: format!("Correct answer: {}", question.correct_letter()),
        explanation: question.explanation().to_owned(),
    }
}

#[must_use]
pub fn map_result(result: &QuizResult) -> ResultVm {
    let passed = result.passed();
    ResultVm {
        mode_label: "",
        score_label: format!("{} / {}", result.score(), result.total_possible()),
        percentage_label: format!("{}%", result.percentage()),
        correct_label: format!(
            "{} correct, {} wrong ({} unanswered)",
            result.correct_count(),
            result.wrong_answers().len(),
            result.unanswered_count()
        ),
        verdict: if passed { "Passed" } else { "Not passed" },
        passed,
        time_taken: None,
        wrong: result.wrong_answers().iter().map(map_wrong_item).collect(),
    }
}

/// `None` until the snapshot carries a result.
#[must_use]
pub fn map_result_page(snapshot: &SessionSnapshot) -> Option<ResultVm> {
    let result = snapshot.result.as_ref()?;
    let mut vm = map_result(result);
    vm.mode_label = mode_label(snapshot.mode);
    vm.time_taken = snapshot
        .finished_at
        .map(|end| format_elapsed(snapshot.started_at, end));
    Some(vm)
}

#[must_use]
pub fn pass_line() -> String {
    format!("Pass mark: {PASS_PERCENTAGE}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use quiz_core::model::{Question, QuestionId, QuizMode, grade};
    use quiz_core::time::fixed_now;
    use services::{Clock, QuizSessionService};

    fn question(id: u64, correct: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}"),
            vec!["A. one".into(), "B. two".into(), "C. three".into()],
            correct,
            1,
            "because",
        )
        .unwrap()
    }

    #[test]
    fn wrong_items_show_pick_and_key() {
        let questions = vec![question(1, "A"), question(2, "B"), question(3, "C")];
        let answers = BTreeMap::from([(0, "A. one".to_owned()), (1, "C. three".to_owned())]);
        let vm = map_result(&grade(&questions, &answers));

        assert_eq!(vm.score_label, "1 / 3");
        assert_eq!(vm.percentage_label, "33%");
        assert_eq!(vm.verdict, "Not passed");
        assert_eq!(vm.correct_label, "1 correct, 2 wrong (1 unanswered)");
        assert_eq!(vm.wrong.len(), 2);

        let picked = &vm.wrong[0];
        assert_eq!(picked.number, 2);
        assert_eq!(picked.your_answer, "Your answer: C");
        assert_eq!(picked.correct_answer, "Correct answer: B");
        let states: Vec<_> = picked.options.iter().map(|o| o.state).collect();
        assert_eq!(
            states,
            vec![OptionState::Dimmed, OptionState::Correct, OptionState::WrongPick]
        );

        let blank = &vm.wrong[1];
        assert_eq!(blank.your_answer, "Not answered");
        assert_eq!(blank.explanation, "because");
    }

    #[test]
    fn page_includes_mode_and_elapsed_time() {
        let bank = vec![question(1, "A"), question(2, "B")];
        let mut quiz = QuizSessionService::with_seed(bank, QuizMode::Practice, 3)
            .unwrap()
            .with_clock(Clock::fixed(fixed_now()));
        assert!(map_result_page(&quiz.snapshot()).is_none());

        quiz.select_option(0, "A. one").unwrap();
        quiz.select_option(1, "B. two").unwrap();
        quiz.submit().unwrap();

        let page = map_result_page(&quiz.snapshot()).unwrap();
        assert_eq!(page.mode_label, "Practice");
        assert!(page.passed);
        assert_eq!(page.percentage_label, "100%");
        assert_eq!(page.time_taken.as_deref(), Some("0:00"));
        assert!(page.wrong.is_empty());
        assert_eq!(pass_line(), "Pass mark: 60%");
    }
}
