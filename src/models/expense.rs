//! Expense model
//!
//! A single debit, either typed in by the user or mapped from a bank
//! statement line.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::ids::ExpenseId;
use super::money::Money;
use crate::error::{ExpenseError, ExpenseResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Dedup key, unique within the store
    pub id: ExpenseId,

    /// Non-negative amount
    pub amount: Money,

    pub category: Category,

    pub description: String,

    /// When the money was spent (serialized as RFC 3339)
    pub date: DateTime<Utc>,

    /// Path or URI of a receipt image; the file itself is not managed here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
}

impl Expense {
    /// Create an expense with a fresh random id
    pub fn new(
        amount: Money,
        category: Category,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self::with_id(ExpenseId::new(), amount, category, description, date)
    }

    pub fn with_id(
        id: ExpenseId,
        amount: Money,
        category: Category,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            amount,
            category,
            description: description.into(),
            date,
            photo_uri: None,
        }
    }

    /// Attach a receipt photo reference
    pub fn with_photo(mut self, uri: impl Into<String>) -> Self {
        self.photo_uri = Some(uri.into());
        self
    }

    /// Calendar day of the expense in the local timezone
    pub fn local_date(&self) -> NaiveDate {
        self.date.with_timezone(&Local).date_naive()
    }

    /// Check the rules the entry form enforces
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }
        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.with_timezone(&Local).format("%Y-%m-%d"),
            self.category,
            self.description,
            self.amount
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    EmptyDescription,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Raw manual-entry fields as typed by the user
///
/// Every field is checked and all problems are reported together, one line
/// per field, before anything is handed to the store.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub amount: String,
    pub category: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub photo_uri: Option<String>,
}

impl ExpenseDraft {
    pub fn into_expense(self) -> ExpenseResult<Expense> {
        let mut problems = Vec::new();

        let amount = match Money::parse(&self.amount) {
            Ok(amount) if amount.is_positive() => Some(amount),
            _ => {
                problems.push("amount: please enter a valid amount".to_string());
                None
            }
        };

        let category = if self.category.trim().is_empty() {
            problems.push("category: please select a category".to_string());
            None
        } else {
            match self.category.parse::<Category>() {
                Ok(category) => Some(category),
                Err(e) => {
                    problems.push(format!("category: {}", e));
                    None
                }
            }
        };

        if self.description.trim().is_empty() {
            problems.push("description: please enter a description".to_string());
        }

        match (amount, category) {
            (Some(amount), Some(category)) if problems.is_empty() => {
                let mut expense = Expense::new(
                    amount,
                    category,
                    self.description.trim(),
                    self.date.unwrap_or_else(Utc::now),
                );
                expense.photo_uri = self.photo_uri.filter(|p| !p.trim().is_empty());
                Ok(expense)
            }
            _ => Err(ExpenseError::Validation(problems.join("\n"))),
        }
    }
}
