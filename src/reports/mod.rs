//! Reports module
//!
//! Aggregations over the visible expenses.

pub mod spending;

pub use spending::{CategoryBreakdown, CategorySpending};
