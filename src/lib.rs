//! expense-tracker - personal expense tracking from the command line
//!
//! Expenses are recorded by hand or imported from a Monobank card
//! statement, kept in a single JSON file and viewed through filters,
//! category breakdowns and exported reports.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory resolution and user settings
//! - `error`: Custom error types
//! - `models`: Expenses, categories, money and view filters
//! - `storage`: JSON file persistence of the expense collection
//! - `services`: The expense store and the filtered view over it
//! - `reports`: Per-category aggregation
//! - `import`: Monobank statement import
//! - `notify`: High-spending alerts
//! - `export`: HTML and CSV reports
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{ExpensePaths, Settings};
//! use expense_tracker::notify::ConsoleNotifier;
//! use expense_tracker::services::ExpenseStore;
//! use expense_tracker::storage::open_repository;
//!
//! let paths = ExpensePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = ExpenseStore::open(open_repository(&paths)?, ConsoleNotifier::new(true));
//! println!("{}", store.total_expenses());
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod notify;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ExpenseError, ExpenseResult};
