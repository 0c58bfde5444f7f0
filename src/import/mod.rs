//! Bank import
//!
//! Pulls recent debits from the Monobank personal API and turns them into
//! expenses. Fetching is separated from applying so the store never waits
//! on the network: [`fetch_expenses`] gathers a batch, then
//! [`apply_batch`] hands it to the store as a single mutation.

pub mod mcc;
pub mod monobank;

use async_trait::async_trait;
use std::fmt;

use crate::config::MonobankSettings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;
use crate::services::ExpenseStore;

pub use mcc::category_for_mcc;
pub use monobank::{Account, MonobankClient, StatementItem, StatementWindow};

/// Read access to a bank's accounts and statements
#[async_trait]
pub trait BankApi: Send + Sync {
    async fn accounts(&self) -> ExpenseResult<Vec<Account>>;

    async fn statement(
        &self,
        account_id: &str,
        window: &StatementWindow,
    ) -> ExpenseResult<Vec<StatementItem>>;
}

/// Which accounts an import reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportStrategy {
    /// Every account except excluded types; a failing account is skipped
    #[default]
    AllCards,
    /// Only the black card; any failure aborts the import
    BlackCardOnly,
}

impl ImportStrategy {
    pub fn select(self, accounts: Vec<Account>, excluded_types: &[String]) -> Vec<Account> {
        accounts
            .into_iter()
            .filter(|account| match self {
                ImportStrategy::AllCards => !excluded_types.iter().any(|t| t == &account.kind),
                ImportStrategy::BlackCardOnly => account.is_black_card(),
            })
            .collect()
    }
}

impl fmt::Display for ImportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStrategy::AllCards => write!(f, "all cards"),
            ImportStrategy::BlackCardOnly => write!(f, "black card only"),
        }
    }
}

/// An account whose statement could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFailure {
    pub account_id: String,
    pub error: String,
}

/// Expenses gathered from the bank, not yet applied to the store
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    pub expenses: Vec<Expense>,
    pub accounts_queried: usize,
    pub failures: Vec<AccountFailure>,
}

/// Outcome of applying a batch to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub fetched: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub failed_accounts: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported {} new expense(s) ({} fetched, {} already present)",
            self.inserted, self.fetched, self.duplicates
        )?;
        if self.failed_accounts > 0 {
            write!(f, "; {} account(s) failed", self.failed_accounts)?;
        }
        Ok(())
    }
}

/// Fetch debits for the configured window from every eligible account
///
/// Fails with an import error before any statement request when no account
/// qualifies. Per-account failures are collected under
/// [`ImportStrategy::AllCards`] and returned as-is under
/// [`ImportStrategy::BlackCardOnly`].
pub async fn fetch_expenses<A>(
    api: &A,
    settings: &MonobankSettings,
    strategy: ImportStrategy,
    window: &StatementWindow,
) -> ExpenseResult<ImportBatch>
where
    A: BankApi + ?Sized,
{
    let accounts = strategy.select(api.accounts().await?, &settings.excluded_account_types);
    if accounts.is_empty() {
        return Err(ExpenseError::Import("no accounts found".into()));
    }

    tracing::info!(accounts = accounts.len(), %strategy, "fetching statements");

    let mut batch = ImportBatch {
        accounts_queried: accounts.len(),
        ..ImportBatch::default()
    };

    for account in &accounts {
        match api.statement(&account.id, window).await {
            Ok(items) => {
                let before = batch.expenses.len();
                batch
                    .expenses
                    .extend(items.into_iter().filter_map(StatementItem::into_expense));
                tracing::debug!(
                    account = %account.id,
                    debits = batch.expenses.len() - before,
                    "statement fetched"
                );
            }
            Err(err) => match strategy {
                ImportStrategy::AllCards => {
                    tracing::warn!(account = %account.id, error = %err, "skipping account");
                    batch.failures.push(AccountFailure {
                        account_id: account.id.clone(),
                        error: err.to_string(),
                    });
                }
                ImportStrategy::BlackCardOnly => return Err(err),
            },
        }
    }

    Ok(batch)
}

/// Add a fetched batch to the store as one mutation
pub fn apply_batch(store: &mut ExpenseStore, batch: ImportBatch) -> ImportSummary {
    let fetched = batch.expenses.len();
    let inserted = store.add_expenses(batch.expenses);
    let summary = ImportSummary {
        fetched,
        inserted,
        duplicates: fetched - inserted,
        failed_accounts: batch.failures.len(),
    };
    tracing::info!(
        fetched = summary.fetched,
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        "import applied"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::monobank::RawId;
    use super::*;
    use crate::models::{Category, Money};
    use crate::notify::RecordingNotifier;
    use crate::storage::ExpenseRepository;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FakeBank {
        accounts: Vec<Account>,
        statements: HashMap<String, Result<Vec<StatementItem>, String>>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeBank {
        fn new(accounts: Vec<Account>) -> Self {
            Self {
                accounts,
                statements: HashMap::new(),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn with_statement(mut self, account: &str, items: Vec<StatementItem>) -> Self {
            self.statements.insert(account.to_string(), Ok(items));
            self
        }

        fn with_failure(mut self, account: &str, message: &str) -> Self {
            self.statements
                .insert(account.to_string(), Err(message.to_string()));
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BankApi for FakeBank {
        async fn accounts(&self) -> ExpenseResult<Vec<Account>> {
            Ok(self.accounts.clone())
        }

        async fn statement(
            &self,
            account_id: &str,
            _window: &StatementWindow,
        ) -> ExpenseResult<Vec<StatementItem>> {
            self.requested.lock().unwrap().push(account_id.to_string());
            match self.statements.get(account_id) {
                Some(Ok(items)) => Ok(items.clone()),
                Some(Err(message)) => Err(ExpenseError::Network(message.clone())),
                None => Ok(Vec::new()),
            }
        }
    }

    fn account(id: &str, kind: &str) -> Account {
        Account {
            id: id.to_string(),
            kind: kind.to_string(),
            currency_code: Some(980),
        }
    }

    fn item(id: &str, amount: i64, mcc: u16) -> StatementItem {
        StatementItem {
            id: RawId::Text(id.to_string()),
            time: 1_700_000_000,
            description: format!("tx {id}"),
            mcc,
            amount,
        }
    }

    fn window() -> StatementWindow {
        StatementWindow::last_days(30, Utc.with_ymd_and_hms(2023, 11, 20, 12, 0, 0).unwrap())
    }

    fn temp_store() -> (TempDir, ExpenseStore) {
        let dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(dir.path().join("expenses.json"));
        let store = ExpenseStore::open(repo, RecordingNotifier::new());
        (dir, store)
    }

    #[tokio::test]
    async fn test_all_cards_skips_fop_and_credits() {
        let bank = FakeBank::new(vec![account("black1", "black"), account("fop1", "fop")])
            .with_statement(
                "black1",
                vec![item("a", -5000, 5411), item("b", 10000, 0), item("c", -1200, 4111)],
            )
            .with_statement("fop1", vec![item("d", -9999, 5411)]);

        let batch = fetch_expenses(
            &bank,
            &MonobankSettings::default(),
            ImportStrategy::AllCards,
            &window(),
        )
        .await
        .unwrap();

        assert_eq!(bank.requested(), vec!["black1".to_string()]);
        assert_eq!(batch.accounts_queried, 1);
        assert_eq!(batch.expenses.len(), 2);
        assert_eq!(batch.expenses[0].amount, Money::from_cents(5000));
        assert_eq!(batch.expenses[0].category, Category::Food);
        assert_eq!(batch.expenses[1].category, Category::Transport);
    }

    #[tokio::test]
    async fn test_all_cards_continues_after_account_failure() {
        let bank = FakeBank::new(vec![account("w1", "white"), account("b1", "black")])
            .with_failure("w1", "429 Too Many Requests")
            .with_statement("b1", vec![item("x", -300, 5812)]);

        let batch = fetch_expenses(
            &bank,
            &MonobankSettings::default(),
            ImportStrategy::AllCards,
            &window(),
        )
        .await
        .unwrap();

        assert_eq!(batch.expenses.len(), 1);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].account_id, "w1");
        assert!(batch.failures[0].error.contains("429"));
    }

    #[tokio::test]
    async fn test_black_only_aborts_on_failure() {
        let bank = FakeBank::new(vec![account("b1", "black"), account("w1", "white")])
            .with_failure("b1", "500 Internal Server Error");

        let err = fetch_expenses(
            &bank,
            &MonobankSettings::default(),
            ImportStrategy::BlackCardOnly,
            &window(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ExpenseError::Network(_)));
        assert_eq!(bank.requested(), vec!["b1".to_string()]);
    }

    #[tokio::test]
    async fn test_no_eligible_accounts_fails_before_statements() {
        let bank = FakeBank::new(vec![account("fop1", "fop")]);

        let err = fetch_expenses(
            &bank,
            &MonobankSettings::default(),
            ImportStrategy::AllCards,
            &window(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ExpenseError::Import(ref msg) if msg == "no accounts found"));
        assert!(bank.requested().is_empty());

        let err = fetch_expenses(
            &FakeBank::new(vec![account("w1", "white")]),
            &MonobankSettings::default(),
            ImportStrategy::BlackCardOnly,
            &window(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExpenseError::Import(_)));
    }

    #[tokio::test]
    async fn test_reimport_is_idempotent() {
        let bank = FakeBank::new(vec![account("b1", "black")])
            .with_statement("b1", vec![item("t1", -1000, 5411), item("t2", -2000, 5651)]);
        let (_dir, mut store) = temp_store();

        for _ in 0..2 {
            let batch = fetch_expenses(
                &bank,
                &MonobankSettings::default(),
                ImportStrategy::AllCards,
                &window(),
            )
            .await
            .unwrap();
            apply_batch(&mut store, batch);
        }

        assert_eq!(store.len(), 2);
        assert_eq!(store.total_expenses(), Money::from_cents(3000));
    }

    #[test]
    fn test_apply_batch_counts_duplicates() {
        let (_dir, mut store) = temp_store();
        let expenses: Vec<Expense> = vec![item("t1", -1000, 5411), item("t2", -2000, 5411)]
            .into_iter()
            .filter_map(StatementItem::into_expense)
            .collect();
        store.add_expense(expenses[0].clone());

        let summary = apply_batch(
            &mut store,
            ImportBatch {
                expenses,
                accounts_queried: 1,
                failures: Vec::new(),
            },
        );

        assert_eq!(summary.fetched, 2);
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.duplicates, 1);
        assert!(summary.to_string().contains("Imported 1 new expense(s)"));
    }
}
