use std::sync::Arc;

use quiz_core::model::QuizMode;
use quiz_core::time::fixed_now;
use services::{Clock, QuizLoopService};
use storage::{InMemoryQuestionBank, JsonQuestionBank};
use ui::vm::{QuizIntent, QuizOutcome, start_quiz};
use ui::{UiApp, ViewError, build_app_context};

struct TestApp {
    quiz_loop: Arc<QuizLoopService>,
}

impl UiApp for TestApp {
    fn initial_mode(&self) -> QuizMode {
        QuizMode::Practice
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}

fn app(quiz_loop: QuizLoopService) -> Arc<dyn UiApp> {
    Arc::new(TestApp {
        quiz_loop: Arc::new(quiz_loop),
    })
}

#[tokio::test]
async fn practice_walkthrough_from_context() {
    let quiz_loop = QuizLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(JsonQuestionBank::bundled()),
    )
    .with_seed(Some(7));
    let ctx = build_app_context(&app(quiz_loop));

    let mut vm = start_quiz(&ctx.quiz_loop(), ctx.initial_mode()).await.unwrap();
    let total = vm.snapshot().total;

    loop {
        let correct = vm.snapshot().question.correct_index();
        vm.apply(QuizIntent::Select(correct)).unwrap();
        let card = vm.question_card();
        assert!(card.explanation.is_some());
        match vm.apply(QuizIntent::Next).unwrap() {
            QuizOutcome::Continue => {}
            QuizOutcome::Finished => break,
            QuizOutcome::NeedsConfirmation(request) => panic!("unexpected {request:?}"),
        }
    }

    let page = vm.result_page().unwrap();
    assert!(page.passed);
    assert_eq!(page.percentage_label, "100%");
    assert_eq!(vm.answer_sheet().len(), total);
}

#[tokio::test]
async fn empty_bank_is_reported_to_the_view() {
    let quiz_loop = QuizLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(InMemoryQuestionBank::default()),
    );
    let err = start_quiz(&quiz_loop, QuizMode::Exam).await.err();
    assert_eq!(err, Some(ViewError::EmptyBank));
    assert_eq!(
        ViewError::EmptyBank.message(),
        "The question bank has no questions."
    );
}
