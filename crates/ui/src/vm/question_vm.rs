use quiz_core::model::{QuizMode, option_body, option_label};
use services::SessionSnapshot;

/// How a single option is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    /// Not picked, no feedback shown.
    Idle,
    /// Picked, no feedback shown.
    Selected,
    /// The answer key, feedback shown.
    Correct,
    /// Picked but wrong, feedback shown.
    WrongPick,
    /// Neither picked nor correct, feedback shown.
    Dimmed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: char,
    pub text: String,
    pub body: String,
    pub state: OptionState,
    pub selectable: bool,
}

/// Everything needed to draw the current question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCardVm {
    pub position: usize,
    pub header: String,
    pub points_label: String,
    pub mode_label: &'static str,
    pub prompt: String,
    pub answered: bool,
    pub options: Vec<OptionVm>,
    /// Present only while the reveal view is shown.
    pub explanation: Option<String>,
    pub progress_percent: u32,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub can_reveal: bool,
    pub next_label: &'static str,
}

#[must_use]
pub fn mode_label(mode: QuizMode) -> &'static str {
    match mode {
        QuizMode::Exam => "Exam",
        QuizMode::Practice => "Practice",
    }
}

#[must_use]
pub fn points_label(points: u32) -> String {
    if points == 1 {
        "1 pt".to_owned()
    } else {
        format!("{points} pts")
    }
}

#[must_use]
pub fn map_question_card(snapshot: &SessionSnapshot) -> QuestionCardVm {
    let question = &snapshot.question;
    let reveal = snapshot.reveal_visible;
    let finished = snapshot.is_finished();
    // Practice locks the pick once feedback is on screen; exam never does.
    let selectable = !finished && (snapshot.mode == QuizMode::Exam || !reveal);

    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let label = option_label(index).unwrap_or('?');
            let is_selected = snapshot.selected_option.as_deref() == Some(text.as_str());
            let state = match (reveal, question.is_correct_letter(label), is_selected) {
                (true, true, _) => OptionState::Correct,
                (true, false, true) => OptionState::WrongPick,
                (true, false, false) => OptionState::Dimmed,
                (false, _, true) => OptionState::Selected,
                (false, _, false) => OptionState::Idle,
            };
            OptionVm {
                index,
                label,
                text: text.clone(),
                body: option_body(text).to_owned(),
                state,
                selectable,
            }
        })
        .collect();

    let total = snapshot.total.max(1);
    let number = snapshot.position + 1;
    let progress_percent = u32::try_from(number * 100 / total).unwrap_or(100);

    QuestionCardVm {
        position: snapshot.position,
        header: format!("Question {number} / {}", snapshot.total),
        points_label: points_label(question.points()),
        mode_label: mode_label(snapshot.mode),
        prompt: question.text().to_owned(),
        answered: snapshot.selected_option.is_some(),
        options,
        explanation: reveal.then(|| question.explanation().to_owned()),
        progress_percent,
        can_go_previous: !finished && snapshot.position > 0,
        can_go_next: snapshot.can_advance,
        can_reveal: !finished && snapshot.mode.allows_reveal() && !reveal,
        next_label: if snapshot.is_last { "Submit" } else { "Next" },
    }
}
