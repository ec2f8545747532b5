pub mod commands;
pub mod controller;
pub mod state;

pub use controller::{ExportOutcome, SessionController, SkipReason};
pub use state::{format_elapsed, SessionSnapshot, SessionState, SessionStatus};
