//! CSV export of expenses
//!
//! One row per expense, in the order given (normally the visible view).

use std::io::Write;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;

const HEADER: [&str; 6] = ["ID", "Date", "Category", "Description", "Amount", "Photo"];

/// Export expenses to CSV
pub fn export_expenses_csv<W: Write>(expenses: &[&Expense], writer: W) -> ExpenseResult<usize> {
    let mut out = csv::Writer::from_writer(writer);
    let export_err = |e: csv::Error| ExpenseError::Export(e.to_string());

    out.write_record(HEADER).map_err(export_err)?;

    for expense in expenses {
        out.write_record([
            expense.id.as_str(),
            expense.date.to_rfc3339().as_str(),
            expense.category.name(),
            expense.description.as_str(),
            expense.amount.to_string().as_str(),
            expense.photo_uri.as_deref().unwrap_or(""),
        ])
        .map_err(export_err)?;
    }

    out.flush().map_err(|e| ExpenseError::Export(e.to_string()))?;
    Ok(expenses.len())
}
