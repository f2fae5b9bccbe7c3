//! TUI (Terminal User Interface) モジュール
//!
//! ratatui を使用した対話ウィザード

pub mod state;
pub mod terminal;
pub mod wizard;

pub use state::{Prefill, WizardState};
pub use wizard::run_wizard;
