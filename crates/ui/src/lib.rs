#![forbid(unsafe_code)]

pub mod context;
pub mod state;
pub mod vm;

pub use context::{AppContext, UiApp, build_app_context};
pub use state::{ViewError, ViewState, view_state_from_result};
