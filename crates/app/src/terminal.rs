use quiz_core::model::label_index;
use services::ConfirmRequest;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use ui::AppContext;
use ui::vm::{
    AnswerSheetCellVm, CellStatus, OptionState, QuestionCardVm, QuizIntent, QuizOutcome, QuizVm,
    ResultVm, pass_line, start_quiz,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Intent(QuizIntent),
    Sheet,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let head = parts.next()?.to_ascii_lowercase();
    let arg = parts.next();

    let input = match (head.as_str(), arg) {
        ("n" | "next", None) => Input::Intent(QuizIntent::Next),
        ("p" | "prev", None) => Input::Intent(QuizIntent::Previous),
        ("r" | "reveal", None) => Input::Intent(QuizIntent::Reveal),
        ("submit", None) => Input::Intent(QuizIntent::Submit),
        ("restart", None) => Input::Intent(QuizIntent::Restart),
        ("auto", None) => Input::Intent(QuizIntent::AutoFill),
        ("s" | "sheet", None) => Input::Sheet,
        ("h" | "help" | "?", None) => Input::Help,
        ("q" | "quit", None) => Input::Quit,
        ("j" | "jump", Some(number)) => {
            let number: usize = number.parse().ok()?;
            Input::Intent(QuizIntent::JumpTo(number.checked_sub(1)?))
        }
        ("m" | "mode", Some(mode)) => Input::Intent(QuizIntent::RequestMode(mode.parse().ok()?)),
        (single, None) if single.chars().count() == 1 => {
            let letter = single.chars().next()?;
            Input::Intent(QuizIntent::Select(label_index(letter)?))
        }
        _ => return None,
    };
    Some(input)
}

fn parse_confirmation(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_help() {
    println!("  <letter>        pick an option");
    println!("  n / p           next / previous question");
    println!("  j <number>      jump to a question");
    println!("  r               reveal the answer (practice mode)");
    println!("  s               show the answer sheet");
    println!("  submit          grade the attempt");
    println!("  m exam|practice switch mode (restarts)");
    println!("  restart         start a new quiz");
    println!("  auto            fill random answers and submit");
    println!("  q               quit");
}

fn marker(state: OptionState) -> &'static str {
    match state {
        OptionState::Idle | OptionState::Dimmed => "   ",
        OptionState::Selected => " > ",
        OptionState::Correct => " + ",
        OptionState::WrongPick => " x ",
    }
}

fn render_card(card: &QuestionCardVm) {
    println!();
    println!(
        "[{}] {}  ({})  {}%",
        card.mode_label, card.header, card.points_label, card.progress_percent
    );
    println!("{}", card.prompt);
    for option in &card.options {
        println!("{}{}", marker(option.state), option.text);
    }
    if let Some(explanation) = &card.explanation {
        println!("  Explanation: {explanation}");
    }
    let mut hints = Vec::new();
    if card.can_go_previous {
        hints.push("p: previous");
    }
    if card.can_go_next {
        hints.push(if card.next_label == "Submit" { "n: submit" } else { "n: next" });
    }
    if card.can_reveal {
        hints.push("r: reveal");
    }
    hints.push("h: help");
    println!("  {}", hints.join("  "));
}

fn render_sheet(cells: &[AnswerSheetCellVm]) {
    let line: Vec<String> = cells
        .iter()
        .map(|cell| match cell.status {
            CellStatus::Current => format!("[{}]", cell.number),
            CellStatus::Answered => format!(" {}*", cell.number),
            CellStatus::Unanswered => format!(" {} ", cell.number),
        })
        .collect();
    println!("{}", line.join(""));
}

fn render_result(page: &ResultVm) {
    println!();
    println!("{} result: {}", page.mode_label, page.verdict);
    println!("  Score: {}  ({})", page.score_label, page.percentage_label);
    println!("  {}", page.correct_label);
    println!("  {}", pass_line());
    if let Some(time) = &page.time_taken {
        println!("  Time: {time}");
    }
    for item in &page.wrong {
        println!();
        println!("  #{} {}", item.number, item.prompt);
        for option in &item.options {
            println!("  {}{}", marker(option.state), option.text);
        }
        println!("    {} | {}", item.your_answer, item.correct_answer);
        println!("    {}", item.explanation);
    }
    println!();
    println!("  restart: new quiz  m exam|practice: switch mode  q: quit");
}

fn render_confirm(request: &ConfirmRequest) {
    println!();
    println!("{}", request.title);
    for line in &request.body {
        println!("  {line}");
    }
    if let Some(warning) = &request.warning {
        println!("  ! {warning}");
    }
    println!("  {} [y] / {} [n]", request.confirm_text, request.cancel_text);
}

fn render(vm: &QuizVm) {
    match vm.result_page() {
        Some(page) => render_result(&page),
        None => render_card(&vm.question_card()),
    }
}

/// Interactive quiz over stdin/stdout until the user quits or input ends.
///
/// # Errors
///
/// Returns loading errors and stdin failures.
pub async fn run_quiz(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut vm = start_quiz(&ctx.quiz_loop(), ctx.initial_mode())
        .await
        .map_err(|err| err.message())?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    render(&vm);
    while let Some(line) = lines.next_line().await? {
        let intent = if vm.pending().is_some() {
            QuizIntent::Confirm(parse_confirmation(&line))
        } else {
            match parse_input(&line) {
                Some(Input::Intent(intent)) => intent,
                Some(Input::Sheet) => {
                    render_sheet(&vm.answer_sheet());
                    continue;
                }
                Some(Input::Help) => {
                    print_help();
                    continue;
                }
                Some(Input::Quit) => break,
                None => {
                    println!("  unrecognized input, h for help");
                    continue;
                }
            }
        };

        debug!(?intent, "applying intent");
        match vm.apply(intent) {
            Ok(QuizOutcome::NeedsConfirmation(request)) => render_confirm(&request),
            Ok(QuizOutcome::Continue | QuizOutcome::Finished) => render(&vm),
            Err(err) => println!("  {}", err.message()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizMode;

    #[test]
    fn letters_select_options() {
        assert_eq!(
            parse_input("b"),
            Some(Input::Intent(QuizIntent::Select(1)))
        );
        assert_eq!(
            parse_input(" A "),
            Some(Input::Intent(QuizIntent::Select(0)))
        );
    }

    #[test]
    fn commands_and_arguments() {
        assert_eq!(parse_input("n"), Some(Input::Intent(QuizIntent::Next)));
        assert_eq!(parse_input("j 3"), Some(Input::Intent(QuizIntent::JumpTo(2))));
        assert_eq!(parse_input("j 0"), None);
        assert_eq!(
            parse_input("m practice"),
            Some(Input::Intent(QuizIntent::RequestMode(QuizMode::Practice)))
        );
        assert_eq!(parse_input("m nope"), None);
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input(""), None);
    }

    #[test]
    fn only_yes_confirms() {
        assert!(parse_confirmation("y"));
        assert!(parse_confirmation("YES\n"));
        assert!(!parse_confirmation(""));
        assert!(!parse_confirmation("n"));
    }
}
