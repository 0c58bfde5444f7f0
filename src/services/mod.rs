//! Service layer
//!
//! The store owns the expense collection and applies mutations; `view`
//! derives the filtered, sorted subset and its total.

pub mod store;
pub mod view;

pub use store::ExpenseStore;
