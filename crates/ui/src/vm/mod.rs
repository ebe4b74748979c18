mod answer_sheet_vm;
mod question_vm;
mod quiz_vm;
mod result_vm;
mod time_fmt;

pub use answer_sheet_vm::{AnswerSheetCellVm, CellStatus, map_answer_sheet};
pub use question_vm::{
    OptionState, OptionVm, QuestionCardVm, map_question_card, mode_label, points_label,
};
pub use quiz_vm::{QuizIntent, QuizOutcome, QuizVm, start_quiz};
pub use result_vm::{ResultVm, WrongItemVm, map_result, map_result_page, pass_line};
pub use time_fmt::format_elapsed;
