//! CLI command for bank import

use chrono::Utc;
use clap::Args;

use crate::config::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::import::{apply_batch, fetch_expenses, ImportStrategy, MonobankClient, StatementWindow};
use crate::services::ExpenseStore;

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Monobank personal API token
    #[arg(long, env = "MONOBANK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Import only from the black card
    #[arg(long)]
    pub black_only: bool,

    /// Days to look back (defaults to the configured value)
    #[arg(long)]
    pub days: Option<u32>,
}

impl ImportArgs {
    pub fn strategy(&self) -> ImportStrategy {
        if self.black_only {
            ImportStrategy::BlackCardOnly
        } else {
            ImportStrategy::AllCards
        }
    }
}

/// Fetch recent card debits and add the new ones to the store
pub async fn handle_import_command(
    store: &mut ExpenseStore,
    settings: &Settings,
    args: ImportArgs,
) -> ExpenseResult<()> {
    let token = args
        .token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            ExpenseError::Validation(
                "A Monobank token is required: pass --token or set MONOBANK_TOKEN".into(),
            )
        })?;

    let client = MonobankClient::new(&settings.monobank.api_url, token)?;
    let days = args.days.unwrap_or(settings.monobank.lookback_days);
    let window = StatementWindow::last_days(days, Utc::now());

    let batch = fetch_expenses(&client, &settings.monobank, args.strategy(), &window).await?;
    let failures = batch.failures.clone();
    let summary = apply_batch(store, batch);

    println!("{}", summary);
    for failure in &failures {
        println!("  account {}: {}", failure.account_id, failure.error);
    }

    Ok(())
}
