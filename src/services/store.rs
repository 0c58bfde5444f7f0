//! Expense store
//!
//! The single owner of the expense collection. Entries are keyed by id, so
//! a repeated id is rejected on insert rather than merged or overwritten.
//! Each entry remembers its insertion sequence, which is the tie-breaker
//! when the view sorts expenses with equal timestamps.
//!
//! Every mutation that changes the collection rewrites the persisted copy,
//! but only once the initial load has completed. Mutations made before
//! that are kept and merged in after the persisted entries.

use std::collections::HashMap;

use chrono::Local;

use crate::models::{Category, Expense, ExpenseFilter, ExpenseId, Money};
use crate::notify::{Notifier, SpendingAlert, SPENDING_ALERT_THRESHOLD};
use crate::reports::CategoryBreakdown;
use crate::storage::ExpenseRepository;

use super::view;

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    expense: Expense,
}

/// Authoritative in-memory expense collection backed by a repository
pub struct ExpenseStore {
    repository: ExpenseRepository,
    notifier: Box<dyn Notifier>,
    entries: HashMap<ExpenseId, Entry>,
    next_seq: u64,
    filter: ExpenseFilter,
    loaded: bool,
    currency_symbol: String,
}

impl ExpenseStore {
    /// Create an empty store; call [`ExpenseStore::initialize`] to load
    pub fn new(repository: ExpenseRepository, notifier: impl Notifier + 'static) -> Self {
        Self {
            repository,
            notifier: Box::new(notifier),
            entries: HashMap::new(),
            next_seq: 0,
            filter: ExpenseFilter::default(),
            loaded: false,
            currency_symbol: String::new(),
        }
    }

    /// Create a store and load the persisted expenses right away
    pub fn open(repository: ExpenseRepository, notifier: impl Notifier + 'static) -> Self {
        let mut store = Self::new(repository, notifier);
        store.initialize();
        store
    }

    /// Currency symbol used in alert messages
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Load the persisted expenses into memory
    ///
    /// Never fails: unreadable data leaves the store empty. Expenses added
    /// before loading are appended after the persisted ones unless their
    /// id is already persisted.
    pub fn initialize(&mut self) {
        if self.loaded {
            tracing::debug!("store already initialized");
            return;
        }

        let pending: Vec<Expense> = self.take_ordered();
        for expense in self.repository.load() {
            if !self.insert(expense.clone()) {
                tracing::warn!(
                    id = %expense.id,
                    "duplicate id in persisted expenses, keeping first"
                );
            }
        }

        let merged = pending
            .into_iter()
            .filter(|expense| self.insert(expense.clone()))
            .count();

        self.loaded = true;

        if merged > 0 {
            tracing::debug!(merged, "merged expenses added before load");
            self.persist();
        }
    }

    /// Whether the initial load has completed
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Insert an expense unless its id is already present
    ///
    /// Returns `true` when inserted. After an insert the day's spending is
    /// re-checked against the alert threshold.
    pub fn add_expense(&mut self, expense: Expense) -> bool {
        if !self.insert(expense) {
            return false;
        }
        self.check_spending_alert();
        self.persist();
        true
    }

    /// Insert every expense whose id is not yet present
    ///
    /// The batch is applied as one mutation: one alert check and one
    /// persisted write, regardless of its size. Returns the number inserted.
    pub fn add_expenses<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = Expense>,
    {
        let mut inserted = 0;
        for expense in batch {
            if self.insert(expense) {
                inserted += 1;
            }
        }

        if inserted > 0 {
            self.check_spending_alert();
            self.persist();
        }
        inserted
    }

    /// Remove the expense with the given id, returning it if it existed
    pub fn delete_expense(&mut self, id: &ExpenseId) -> Option<Expense> {
        let removed = self.entries.remove(id)?;
        self.persist();
        Some(removed.expense)
    }

    /// Reassign the category of an expense
    ///
    /// Returns `false` if no expense has that id.
    pub fn update_category(&mut self, id: &ExpenseId, category: Category) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            return false;
        };
        if entry.expense.category != category {
            entry.expense.category = category;
            self.persist();
        }
        true
    }

    /// Drop every expense and erase the persisted copy
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 0;
        self.repository.clear();
    }

    pub fn filter(&self) -> &ExpenseFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: ExpenseFilter) {
        self.filter = filter;
    }

    /// Show a single category (`None` shows all), dropping other criteria
    pub fn select_category(&mut self, category: Option<Category>) {
        self.filter = ExpenseFilter {
            category,
            ..ExpenseFilter::default()
        };
    }

    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        self.entries.get(id).map(|entry| &entry.expense)
    }

    pub fn contains(&self, id: &ExpenseId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All expenses in insertion order
    pub fn expenses(&self) -> Vec<&Expense> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| &entry.expense).collect()
    }

    /// Expenses passing the current filter, most recent first
    pub fn visible(&self) -> Vec<&Expense> {
        view::visible(self.expenses(), &self.filter)
    }

    /// Total of the visible expenses
    pub fn total_expenses(&self) -> Money {
        view::total(&self.visible())
    }

    /// Per-category totals of the visible expenses
    pub fn breakdown(&self) -> CategoryBreakdown {
        CategoryBreakdown::from_expenses(&self.visible())
    }

    /// Spending dated today, regardless of the current filter
    pub fn today_spending(&self) -> Money {
        view::spending_on(
            self.entries.values().map(|entry| &entry.expense),
            Local::now().date_naive(),
        )
    }

    fn insert(&mut self, expense: Expense) -> bool {
        if self.entries.contains_key(&expense.id) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(expense.id.clone(), Entry { seq, expense });
        true
    }

    fn take_ordered(&mut self) -> Vec<Expense> {
        let mut entries: Vec<Entry> = self.entries.drain().map(|(_, entry)| entry).collect();
        entries.sort_by_key(|entry| entry.seq);
        self.next_seq = 0;
        entries.into_iter().map(|entry| entry.expense).collect()
    }

    fn check_spending_alert(&self) {
        let spent = self.today_spending();
        if spent > SPENDING_ALERT_THRESHOLD {
            self.notifier
                .spending_alert(&SpendingAlert::new(spent, None, &self.currency_symbol));
        }
    }

    fn persist(&self) {
        if !self.loaded {
            tracing::debug!("initial load not completed, not persisting");
            return;
        }
        let snapshot: Vec<Expense> = self.expenses().into_iter().cloned().collect();
        self.repository.save(&snapshot);
    }
}
