/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    /// Zero-based position of the current question.
    pub position: usize,
    pub is_last: bool,
    pub is_complete: bool,
}

impl SessionProgress {
    /// One-based question number, as displayed.
    #[must_use]
    pub fn number(&self) -> usize {
        self.position + 1
    }
}
