//! Expense display formatting
//!
//! Terminal rendering of expense rows, lists, details and the summary
//! header shown above a filtered list.

use crate::models::{Expense, ExpenseFilter, Money};

/// Cut `s` to `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return ".".repeat(max_len);
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{}...", kept)
}

/// Format a single expense as a list row
pub fn format_expense_row(expense: &Expense, currency_symbol: &str) -> String {
    let receipt = if expense.photo_uri.is_some() { " 📎" } else { "" };
    format!(
        "{:<10} {:<13} {:<28} {:>12}  {}{}",
        expense.local_date().format("%Y-%m-%d"),
        expense.category,
        truncate(&expense.description, 28),
        expense.amount.format_with_symbol(currency_symbol),
        expense.id,
        receipt
    )
}

/// Format expenses as a table, in the order given
pub fn format_expense_list(expenses: &[&Expense], currency_symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10} {:<13} {:<28} {:>12}  {}\n",
        "Date", "Category", "Description", "Amount", "ID"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense, currency_symbol));
        output.push('\n');
    }

    output
}

pub fn format_expense_details(expense: &Expense, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!(
        "Date:        {}\n",
        expense.date.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!(
        "Amount:      {}\n",
        expense.amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("Category:    {}\n", expense.category));
    output.push_str(&format!("Description: {}\n", expense.description));
    if let Some(photo) = &expense.photo_uri {
        output.push_str(&format!("Receipt:     {}\n", photo));
    }

    output
}

/// Describe the active filter criteria on one line
pub fn describe_filter(filter: &ExpenseFilter, currency_symbol: &str) -> String {
    let mut parts = Vec::new();

    if let Some(category) = filter.category {
        parts.push(format!("category {}", category));
    }
    if let Some(range) = &filter.date_range {
        parts.push(format!(
            "{} to {}",
            range.start.with_timezone(&chrono::Local).format("%Y-%m-%d"),
            range.end.with_timezone(&chrono::Local).format("%Y-%m-%d")
        ));
    }
    if let Some(text) = filter.search_text.as_deref().filter(|t| !t.trim().is_empty()) {
        parts.push(format!("matching \"{}\"", text));
    }
    if let Some(range) = &filter.amount_range {
        parts.push(format!(
            "{} to {}",
            range.min.format_with_symbol(currency_symbol),
            range.max.format_with_symbol(currency_symbol)
        ));
    }

    if parts.is_empty() {
        "all expenses".to_string()
    } else {
        parts.join(", ")
    }
}

/// Summary header: total of the visible expenses and the overall count
pub fn format_summary(
    visible_total: Money,
    visible_count: usize,
    total_count: usize,
    filter: &ExpenseFilter,
    currency_symbol: &str,
) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Total Expenses: {}\n",
        visible_total.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("Transactions:   {}\n", total_count));
    if filter.is_active() {
        output.push_str(&format!(
            "Showing:        {} of {} ({})\n",
            visible_count,
            total_count,
            describe_filter(filter, currency_symbol)
        ));
    }
    output
}
