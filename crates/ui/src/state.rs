use services::SessionError;
use storage::StorageError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    EmptyBank,
    LoadFailed,
    InvalidOption,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::EmptyBank => "The question bank has no questions.",
            Self::LoadFailed => "The question bank could not be loaded.",
            Self::InvalidOption => "That option does not exist for this question.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::EmptyBank | SessionError::Storage(StorageError::Empty) => Self::EmptyBank,
            SessionError::Storage(_) => Self::LoadFailed,
            SessionError::OptionOutOfRange { .. } => Self::InvalidOption,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[must_use]
pub fn view_state_from_result<T>(result: Result<T, ViewError>) -> ViewState<T> {
    match result {
        Ok(data) => ViewState::Ready(data),
        Err(err) => ViewState::Error(err),
    }
}
