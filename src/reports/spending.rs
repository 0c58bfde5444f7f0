//! Spending breakdown by category
//!
//! Groups a set of expenses by category and reports each category's total,
//! count and share of the overall total. This feeds the chart and the
//! summary views.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Category, Expense, Money};

/// Spending in one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    pub category: Category,
    pub total: Money,
    pub count: usize,
    /// Share of the breakdown total, 0.0 when the total is zero
    pub percentage: f64,
}

/// Per-category totals of a set of expenses
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryBreakdown {
    /// Categories with at least one expense, largest total first
    pub categories: Vec<CategorySpending>,
    pub total: Money,
    pub expense_count: usize,
}

impl CategoryBreakdown {
    pub fn from_expenses(expenses: &[&Expense]) -> Self {
        let mut by_category: HashMap<Category, (Money, usize)> = HashMap::new();
        for expense in expenses {
            let entry = by_category
                .entry(expense.category)
                .or_insert((Money::zero(), 0));
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        let total: Money = expenses.iter().map(|e| e.amount).sum();

        let mut categories: Vec<CategorySpending> = by_category
            .into_iter()
            .map(|(category, (spent, count))| CategorySpending {
                category,
                total: spent,
                count,
                percentage: spent.percentage_of(total),
            })
            .collect();

        categories.sort_by(|a, b| b.total.cmp(&a.total).then(a.category.cmp(&b.category)));

        Self {
            categories,
            total,
            expense_count: expenses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, category: Category) -> Option<&CategorySpending> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Share of a category, 0.0 if it has no spending
    pub fn percentage(&self, category: Category) -> f64 {
        self.get(category).map(|c| c.percentage).unwrap_or(0.0)
    }

    pub fn top_categories(&self, limit: usize) -> &[CategorySpending] {
        &self.categories[..limit.min(self.categories.len())]
    }

    /// Format the breakdown for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:<15} {:>14} {:>7} {:>7}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(46));
        output.push('\n');

        for row in &self.categories {
            output.push_str(&format!(
                "{:<15} {:>14} {:>7} {:>6.1}%\n",
                row.category,
                row.total.format_with_symbol(currency_symbol),
                row.count,
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(46));
        output.push('\n');
        output.push_str(&format!(
            "{:<15} {:>14} {:>7}\n",
            "TOTAL",
            self.total.format_with_symbol(currency_symbol),
            self.expense_count
        ));

        output
    }

    /// Export the breakdown to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> ExpenseResult<()> {
        let mut out = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| ExpenseError::Export(e.to_string());

        out.write_record(["Category", "Amount", "Count", "Percentage"])
            .map_err(export_err)?;

        for row in &self.categories {
            out.write_record([
                row.category.name().to_string(),
                row.total.to_string(),
                row.count.to_string(),
                format!("{:.2}", row.percentage),
            ])
            .map_err(export_err)?;
        }

        out.flush()
            .map_err(|e| ExpenseError::Export(e.to_string()))?;
        Ok(())
    }
}
