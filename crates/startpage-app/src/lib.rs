//! Start page host shell
//!
//! Opens the storage slot, loads the store and drives it from command-line
//! commands on the current thread.

mod app;
mod commands;

pub use app::{AppConfig, AppError, DATA_DIR_ENV};
pub use commands::{Command, PomodoroCommand, USAGE, run_command, run_pomodoro};
