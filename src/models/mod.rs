//! Core data models
//!
//! Expenses, their closed set of categories, money amounts and the view
//! criteria applied to the expense list.

pub mod category;
pub mod expense;
pub mod filter;
pub mod ids;
pub mod money;

pub use category::Category;
pub use expense::{Expense, ExpenseDraft, ExpenseValidationError};
pub use filter::{AmountRange, DatePreset, DateRange, ExpenseFilter};
pub use ids::ExpenseId;
pub use money::Money;
