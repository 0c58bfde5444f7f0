//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the expense store.

pub mod expense;
pub mod filter;
pub mod import;
pub mod report;

pub use expense::{handle_expense_command, ExpenseCommands};
pub use filter::FilterArgs;
pub use import::{handle_import_command, ImportArgs};
pub use report::{handle_report_command, ReportArgs, ReportFormat};
