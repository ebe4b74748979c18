use services::SessionSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStatus {
    Current,
    Answered,
    Unanswered,
}

/// One cell of the question navigator grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerSheetCellVm {
    pub position: usize,
    pub number: usize,
    pub status: CellStatus,
}

/// The navigator grid; the current question wins over its answered state.
#[must_use]
pub fn map_answer_sheet(snapshot: &SessionSnapshot) -> Vec<AnswerSheetCellVm> {
    snapshot
        .answered
        .iter()
        .enumerate()
        .map(|(position, answered)| {
            let status = if position == snapshot.position {
                CellStatus::Current
            } else if *answered {
                CellStatus::Answered
            } else {
                CellStatus::Unanswered
            };
            AnswerSheetCellVm {
                position,
                number: position + 1,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionId, QuizMode};
    use services::QuizSessionService;

    #[test]
    fn statuses_track_answers_and_position() {
        let bank = (1..=4)
            .map(|i| {
                Question::new(
                    QuestionId::new(i),
                    "Q",
                    vec!["A. x".into(), "B. y".into()],
                    "B",
                    1,
                    "",
                )
                .unwrap()
            })
            .collect();
        let mut quiz = QuizSessionService::with_seed(bank, QuizMode::Practice, 5).unwrap();
        quiz.select_option(0, "A. x").unwrap();
        quiz.select_option(2, "B. y").unwrap();
        quiz.jump_to(2);

        let sheet = map_answer_sheet(&quiz.snapshot());
        let statuses: Vec<_> = sheet.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                CellStatus::Answered,
                CellStatus::Unanswered,
                CellStatus::Current,
                CellStatus::Unanswered,
            ]
        );
        assert_eq!(sheet[3].number, 4);
    }
}
