// Terminal UI for World Window using ratatui
// Cards on the left, favorites on the right, toasts at the bottom

pub mod app;
pub mod help_ui;
pub mod runner;
pub mod ui;

pub use app::{App, Command, Completion, Focus, InputMode};
pub use runner::run_tui;
