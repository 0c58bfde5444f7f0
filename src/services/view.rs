//! Derived views over the expense collection
//!
//! Pure functions: they take the collection (in insertion order) and a
//! filter, and never touch storage.

use chrono::NaiveDate;

use crate::models::{Expense, ExpenseFilter, Money};

/// Expenses passing `filter`, most recent first
///
/// The sort is stable, so expenses with the same timestamp keep the order
/// in which `expenses` yields them.
pub fn visible<'a, I>(expenses: I, filter: &ExpenseFilter) -> Vec<&'a Expense>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut matching: Vec<&Expense> = expenses
        .into_iter()
        .filter(|expense| filter.matches(expense))
        .collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));
    matching
}

/// Sum of amounts
pub fn total(expenses: &[&Expense]) -> Money {
    expenses.iter().map(|e| e.amount).sum()
}

/// Sum of amounts dated on the given local calendar day
pub fn spending_on<'a, I>(expenses: I, day: NaiveDate) -> Money
where
    I: IntoIterator<Item = &'a Expense>,
{
    expenses
        .into_iter()
        .filter(|e| e.local_date() == day)
        .map(|e| e.amount)
        .sum()
}
