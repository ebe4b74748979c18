use std::path::PathBuf;

use quiz_core::model::QuestionId;
use storage::{JsonQuestionBank, QuestionBank, StorageError};

fn temp_bank(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("quiz-bank-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).expect("write temp bank");
    path
}

#[tokio::test]
async fn file_bank_loads_in_stored_order() {
    let path = temp_bank(
        r#"[
            {"id": 20, "question": "Second?", "options": ["A. no", "B. yes"], "answer": "B", "score": 5},
            {"id": 10, "question": "First?", "options": ["A. yes", "B. no"], "answer": "A", "explanation": "obvious"}
        ]"#,
    );

    let bank = JsonQuestionBank::from_path(&path);
    let questions = bank.load_questions().await.expect("load");
    std::fs::remove_file(&path).ok();

    let ids: Vec<_> = questions.iter().map(|q| q.id()).collect();
    assert_eq!(ids, vec![QuestionId::new(20), QuestionId::new(10)]);
    assert_eq!(questions[0].points(), 5);
    assert_eq!(questions[1].explanation(), "obvious");
    assert_eq!(bank.describe(), path.display().to_string());
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join(format!("missing-{}.json", uuid::Uuid::new_v4()));
    let err = JsonQuestionBank::from_path(&path)
        .load_questions()
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Io { path: p, .. } if p == path));
}

#[tokio::test]
async fn mislabelled_option_fails_fast() {
    let path = temp_bank(
        r#"[{"id": 1, "question": "Q", "options": ["A. x", "A. y"], "answer": "A"}]"#,
    );
    let err = JsonQuestionBank::from_path(&path)
        .load_questions()
        .await
        .unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(matches!(err, StorageError::Invalid { id, .. } if id == QuestionId::new(1)));
}

#[tokio::test]
async fn empty_array_is_rejected() {
    let path = temp_bank("[]");
    let err = JsonQuestionBank::from_path(&path)
        .load_questions()
        .await
        .unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(matches!(err, StorageError::Empty));
}
