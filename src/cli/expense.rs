//! CLI commands for expense management
//!
//! Manual entry, listing, summaries and the single-expense edits.

use clap::Subcommand;

use super::filter::{parse_local_datetime, FilterArgs};
use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_list, format_summary};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Category, ExpenseDraft, ExpenseId};
use crate::services::ExpenseStore;

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount spent, e.g. 125.50
        amount: String,
        /// One of: Food, Transport, Entertainment, Bills, Shopping, Health, Other
        category: String,
        /// What the money was spent on
        description: String,
        /// When it was spent (YYYY-MM-DD or YYYY-MM-DDTHH:MM, default now)
        #[arg(short, long)]
        date: Option<String>,
        /// Path to a receipt photo
        #[arg(long)]
        photo: Option<String>,
    },

    /// List expenses, most recent first
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Show at most this many expenses
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show totals and the per-category breakdown
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show one expense
    Show {
        /// Expense ID
        id: ExpenseId,
    },

    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// Change the category of an expense
    Categorize {
        /// Expense ID
        id: ExpenseId,
        /// New category
        category: Category,
    },

    /// Delete every expense
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Handle expense commands
pub fn handle_expense_command(
    store: &mut ExpenseStore,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            description,
            date,
            photo,
        } => {
            let date = date.as_deref().map(parse_local_datetime).transpose()?;
            let expense = ExpenseDraft {
                amount,
                category,
                description,
                date,
                photo_uri: photo,
            }
            .into_expense()?;

            let details = format_expense_details(&expense, symbol);
            if store.add_expense(expense) {
                println!("Added expense:");
                print!("{}", details);
            } else {
                println!("Expense already exists, nothing added.");
            }
        }

        ExpenseCommands::List { filters, limit } => {
            store.set_filter(filters.to_filter()?);
            let visible = store.visible();
            let shown = match limit {
                Some(n) if n < visible.len() => &visible[..n],
                _ => &visible[..],
            };

            print!("{}", format_expense_list(shown, symbol));
            if shown.len() < visible.len() {
                println!("... {} more", visible.len() - shown.len());
            }
        }

        ExpenseCommands::Summary { filters } => {
            store.set_filter(filters.to_filter()?);
            let visible = store.visible();

            print!(
                "{}",
                format_summary(
                    store.total_expenses(),
                    visible.len(),
                    store.len(),
                    store.filter(),
                    symbol
                )
            );

            let breakdown = store.breakdown();
            if !breakdown.is_empty() {
                println!();
                print!("{}", breakdown.format_terminal(symbol));
            }
        }

        ExpenseCommands::Show { id } => {
            let expense = store
                .get(&id)
                .ok_or_else(|| ExpenseError::expense_not_found(id.as_str()))?;
            print!("{}", format_expense_details(expense, symbol));
        }

        ExpenseCommands::Delete { id } => {
            let removed = store
                .delete_expense(&id)
                .ok_or_else(|| ExpenseError::expense_not_found(id.as_str()))?;
            println!(
                "Deleted expense {} ({}, {})",
                removed.id,
                removed.description,
                removed.amount.format_with_symbol(symbol)
            );
        }

        ExpenseCommands::Categorize { id, category } => {
            if !store.update_category(&id, category) {
                return Err(ExpenseError::expense_not_found(id.as_str()));
            }
            println!("Expense {} is now in {}", id, category);
        }

        ExpenseCommands::Clear { yes } => {
            if !yes {
                return Err(ExpenseError::Validation(
                    "Refusing to delete all expenses without --yes".into(),
                ));
            }
            let count = store.len();
            store.clear();
            println!("Deleted {} expense(s)", count);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, Money};
    use crate::notify::RecordingNotifier;
    use crate::storage::ExpenseRepository;
    use chrono::Utc;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ExpenseStore, Settings) {
        let dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(dir.path().join("expenses.json"));
        (dir, ExpenseStore::open(repo, RecordingNotifier::new()), Settings::default())
    }

    #[test]
    fn test_add_validates_before_store() {
        let (_dir, mut store, settings) = setup();
        let err = handle_expense_command(
            &mut store,
            &settings,
            ExpenseCommands::Add {
                amount: "-5".into(),
                category: "Groceries".into(),
                description: " ".into(),
                date: None,
                photo: None,
            },
        )
        .unwrap_err();

        assert!(err.is_validation());
        let message = err.to_string();
        assert!(message.contains("amount:"));
        assert!(message.contains("category:"));
        assert!(message.contains("description:"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_then_categorize_and_delete() {
        let (_dir, mut store, settings) = setup();
        handle_expense_command(
            &mut store,
            &settings,
            ExpenseCommands::Add {
                amount: "12.30".into(),
                category: "food".into(),
                description: "Lunch".into(),
                date: Some("2024-04-02".into()),
                photo: None,
            },
        )
        .unwrap();

        let id = store.expenses()[0].id.clone();
        assert_eq!(store.get(&id).unwrap().amount, Money::from_cents(1230));

        handle_expense_command(
            &mut store,
            &settings,
            ExpenseCommands::Categorize {
                id: id.clone(),
                category: Category::Shopping,
            },
        )
        .unwrap();
        assert_eq!(store.get(&id).unwrap().category, Category::Shopping);

        handle_expense_command(&mut store, &settings, ExpenseCommands::Delete { id: id.clone() })
            .unwrap();
        assert!(store.is_empty());

        let err = handle_expense_command(&mut store, &settings, ExpenseCommands::Delete { id })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let (_dir, mut store, settings) = setup();
        store.add_expense(Expense::new(
            Money::from_cents(100),
            Category::Other,
            "x",
            Utc::now(),
        ));

        assert!(handle_expense_command(&mut store, &settings, ExpenseCommands::Clear { yes: false })
            .is_err());
        assert_eq!(store.len(), 1);

        handle_expense_command(&mut store, &settings, ExpenseCommands::Clear { yes: true })
            .unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_applies_filter() {
        let (_dir, mut store, settings) = setup();
        let now = Utc::now();
        store.add_expense(Expense::new(Money::from_cents(100), Category::Food, "Bread", now));
        store.add_expense(Expense::new(Money::from_cents(200), Category::Bills, "Power", now));

        handle_expense_command(
            &mut store,
            &settings,
            ExpenseCommands::List {
                filters: FilterArgs {
                    category: Some(Category::Bills),
                    ..Default::default()
                },
                limit: None,
            },
        )
        .unwrap();

        assert_eq!(store.visible().len(), 1);
        assert_eq!(store.total_expenses(), Money::from_cents(200));
    }
}
