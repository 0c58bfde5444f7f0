//! CLI command for reports
//!
//! Renders the visible expenses as an HTML document or CSV.

use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use super::filter::FilterArgs;
use crate::config::{ExpensePaths, Settings};
use crate::error::{ExpenseError, ExpenseResult};
use crate::export::{export_expenses_csv, html};
use crate::services::ExpenseStore;

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Standalone HTML document
    #[default]
    Html,
    /// Spreadsheet-compatible rows
    Csv,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    pub format: ReportFormat,

    /// Where to put the report (HTML stays in the reports directory if omitted,
    /// CSV goes to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the report command
pub fn handle_report_command(
    store: &mut ExpenseStore,
    settings: &Settings,
    paths: &ExpensePaths,
    args: ReportArgs,
) -> ExpenseResult<()> {
    store.set_filter(args.filters.to_filter()?);
    let visible = store.visible();

    match args.format {
        ReportFormat::Html => {
            let breakdown = store.breakdown();
            let document = html::render(
                &visible,
                &breakdown,
                &settings.currency_symbol,
                &paths.reports_dir(),
            )?;

            match args.output {
                Some(output) => {
                    let shared = html::share(document, &output)?;
                    println!("Report saved to: {}", shared.display());
                }
                None => println!("Report saved to: {}", document.path().display()),
            }
        }
        ReportFormat::Csv => match args.output {
            Some(output) => {
                let file = File::create(&output).map_err(|e| {
                    ExpenseError::Export(format!(
                        "Failed to create file {}: {}",
                        output.display(),
                        e
                    ))
                })?;
                let count = export_expenses_csv(&visible, BufWriter::new(file))?;
                println!("Exported {} expense(s) to: {}", count, output.display());
            }
            None => {
                export_expenses_csv(&visible, io::stdout().lock())?;
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Expense, Money};
    use crate::notify::RecordingNotifier;
    use crate::storage::open_repository;
    use chrono::Utc;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ExpensePaths, ExpenseStore) {
        let dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(dir.path().to_path_buf());
        let repo = open_repository(&paths).unwrap();
        let mut store = ExpenseStore::open(repo, RecordingNotifier::new());
        let now = Utc::now();
        store.add_expense(Expense::new(Money::from_cents(900), Category::Food, "Soup", now));
        store.add_expense(Expense::new(Money::from_cents(4000), Category::Bills, "Water", now));
        (dir, paths, store)
    }

    #[test]
    fn test_csv_report_uses_filter() {
        let (dir, paths, mut store) = setup();
        let output = dir.path().join("out.csv");

        handle_report_command(
            &mut store,
            &Settings::default(),
            &paths,
            ReportArgs {
                filters: FilterArgs {
                    category: Some(Category::Food),
                    ..Default::default()
                },
                format: ReportFormat::Csv,
                output: Some(output.clone()),
            },
        )
        .unwrap();

        let text = std::fs::read_to_string(output).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Soup"));
        assert!(!text.contains("Water"));
    }

    #[test]
    fn test_html_report_shared_to_output() {
        let (dir, paths, mut store) = setup();
        let output = dir.path().join("report.html");

        handle_report_command(
            &mut store,
            &Settings::default(),
            &paths,
            ReportArgs {
                filters: FilterArgs::default(),
                format: ReportFormat::Html,
                output: Some(output.clone()),
            },
        )
        .unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert_eq!(html.matches("<li>").count(), 2);
        let leftovers = std::fs::read_dir(paths.reports_dir()).unwrap().count();
        assert_eq!(leftovers, 0);
    }
}
