//! Display formatting for terminal output

pub mod expense;

pub use expense::{
    describe_filter, format_expense_details, format_expense_list, format_expense_row,
    format_summary, truncate,
};
