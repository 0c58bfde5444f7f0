//! Storage layer
//!
//! JSON file storage with atomic writes and automatic directory creation.

pub mod expenses;
pub mod file_io;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, remove_file_if_exists, write_json_atomic};

use crate::config::paths::ExpensePaths;
use crate::error::ExpenseError;

/// Open the expense repository under the configured data directory
pub fn open_repository(paths: &ExpensePaths) -> Result<ExpenseRepository, ExpenseError> {
    paths.ensure_directories()?;
    Ok(ExpenseRepository::new(paths.expenses_file()))
}
