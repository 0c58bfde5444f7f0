//! HTML expense report
//!
//! Renders the visible expenses into a standalone HTML document under the
//! reports directory. The document's path is its handle: [`share`] copies
//! it to wherever the user wants it and then removes the temporary file.

use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;
use crate::reports::CategoryBreakdown;
use crate::storage::remove_file_if_exists;

/// A rendered report on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    path: PathBuf,
}

impl ReportDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build the report markup
pub fn render_html(
    expenses: &[&Expense],
    breakdown: &CategoryBreakdown,
    currency_symbol: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let symbol = escape_html(currency_symbol);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Expense Report</title>\n</head>\n<body>\n");
    html.push_str("<h1>Expense Report</h1>\n");
    let _ = writeln!(
        html,
        "<p>Generated {}</p>",
        generated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );

    if expenses.is_empty() {
        html.push_str("<p>No expenses.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for expense in expenses {
            let _ = writeln!(
                html,
                "<li>{} – {} – {}{} <span>{}</span></li>",
                expense.local_date().format("%Y-%m-%d"),
                expense.category,
                symbol,
                expense.amount,
                escape_html(&expense.description)
            );
        }
        html.push_str("</ul>\n");
    }

    let _ = writeln!(
        html,
        "<p><strong>Total: {}{}</strong> ({} expenses)</p>",
        symbol, breakdown.total, breakdown.expense_count
    );

    if !breakdown.is_empty() {
        html.push_str("<h2>By category</h2>\n<table>\n");
        html.push_str("<tr><th>Category</th><th>Amount</th><th>Count</th><th>Share</th></tr>\n");
        for row in &breakdown.categories {
            let _ = writeln!(
                html,
                "<tr><td style=\"color:{}\">{}</td><td>{}{}</td><td>{}</td><td>{:.1}%</td></tr>",
                row.category.color(),
                row.category,
                symbol,
                row.total,
                row.count,
                row.percentage
            );
        }
        html.push_str("</table>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Render the report into `reports_dir` and return its handle
pub fn render(
    expenses: &[&Expense],
    breakdown: &CategoryBreakdown,
    currency_symbol: &str,
    reports_dir: &Path,
) -> ExpenseResult<ReportDocument> {
    fs::create_dir_all(reports_dir).map_err(|e| {
        ExpenseError::Export(format!(
            "Failed to create reports directory {}: {}",
            reports_dir.display(),
            e
        ))
    })?;

    let now = Utc::now();
    let path = reports_dir.join(format!(
        "expense-report-{}.html",
        now.format("%Y%m%d-%H%M%S%3f")
    ));
    let html = render_html(expenses, breakdown, currency_symbol, now);

    fs::write(&path, html).map_err(|e| {
        ExpenseError::Export(format!("Failed to write report {}: {}", path.display(), e))
    })?;

    tracing::debug!(path = %path.display(), expenses = expenses.len(), "report rendered");
    Ok(ReportDocument { path })
}

/// Deliver a rendered report to `destination`
///
/// The temporary document is removed whether or not the copy succeeds; a
/// failure to remove it is only logged.
pub fn share(document: ReportDocument, destination: &Path) -> ExpenseResult<PathBuf> {
    let copied = fs::copy(&document.path, destination).map_err(|e| {
        ExpenseError::Export(format!(
            "Failed to share report to {}: {}",
            destination.display(),
            e
        ))
    });

    if let Err(err) = remove_file_if_exists(&document.path) {
        tracing::error!(path = %document.path.display(), error = %err, "failed to delete report");
    }

    copied.map(|_| destination.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ExpenseId, Money};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn sample() -> Vec<Expense> {
        let date = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        vec![
            Expense::with_id(
                ExpenseId::from("a"),
                Money::from_cents(2550),
                Category::Food,
                "Fish & chips",
                date,
            ),
            Expense::with_id(
                ExpenseId::from("b"),
                Money::from_cents(1000),
                Category::Transport,
                "<script>",
                date,
            ),
        ]
    }

    #[test]
    fn test_render_html_lists_each_expense() {
        let list = sample();
        let refs: Vec<&Expense> = list.iter().collect();
        let breakdown = CategoryBreakdown::from_expenses(&refs);
        let html = render_html(&refs, &breakdown, "₴", Utc::now());

        assert!(html.contains("<h1>Expense Report</h1>"));
        assert_eq!(html.matches("<li>").count(), 2);
        assert!(html.contains("– Food – ₴25.50"));
        assert!(html.contains("– Transport – ₴10.00"));
        assert!(html.contains("Total: ₴35.50"));
        assert!(html.contains("Fish &amp; chips"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_html_empty() {
        let html = render_html(&[], &CategoryBreakdown::default(), "₴", Utc::now());
        assert!(html.contains("No expenses."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_render_then_share_removes_temp_document() {
        let temp = TempDir::new().unwrap();
        let reports = temp.path().join("reports");
        let list = sample();
        let refs: Vec<&Expense> = list.iter().collect();
        let breakdown = CategoryBreakdown::from_expenses(&refs);

        let doc = render(&refs, &breakdown, "₴", &reports).unwrap();
        assert!(doc.path().exists());
        let temp_path = doc.path().to_path_buf();

        let dest = temp.path().join("shared.html");
        let shared = share(doc, &dest).unwrap();

        assert_eq!(shared, dest);
        assert!(dest.exists());
        assert!(!temp_path.exists());
        assert!(fs::read_to_string(&dest).unwrap().contains("Expense Report"));
    }

    #[test]
    fn test_share_failure_still_deletes_document() {
        let temp = TempDir::new().unwrap();
        let doc = render(&[], &CategoryBreakdown::default(), "₴", temp.path()).unwrap();
        let temp_path = doc.path().to_path_buf();

        let dest = temp.path().join("missing-dir").join("out.html");
        let err = share(doc, &dest).unwrap_err();

        assert!(matches!(err, ExpenseError::Export(_)));
        assert!(!temp_path.exists());
    }
}
