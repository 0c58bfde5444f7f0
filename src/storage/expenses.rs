//! Expense repository for JSON storage
//!
//! One file, `expenses.json`, holds the whole collection as a JSON array.
//! Records are decoded one at a time: a record that no longer parses is
//! skipped and copied to `expenses.rejected.json` instead of taking the
//! rest of the file down with it.
//!
//! The `try_*` methods report failures; the plain methods are the
//! best-effort variants the store uses, which log and carry on.

use std::path::{Path, PathBuf};

use crate::error::ExpenseResult;
use crate::models::Expense;

use super::file_io::{read_json, remove_file_if_exists, write_json_atomic};

/// Durable slot holding the serialized expense list
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    path: PathBuf,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where unreadable records are set aside
    pub fn rejected_path(&self) -> PathBuf {
        self.path.with_file_name("expenses.rejected.json")
    }

    /// Read the persisted list; a missing file is an empty list
    ///
    /// Fails only when the file is not a JSON array. Individual records
    /// that don't decode are dropped from the result.
    pub fn try_load(&self) -> ExpenseResult<Vec<Expense>> {
        let records: Vec<serde_json::Value> = read_json(&self.path)?;

        let mut expenses = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Expense>(record.clone()) {
                Ok(expense) => expenses.push(expense),
                Err(err) => {
                    tracing::warn!(index, error = %err, "skipping unreadable expense record");
                    rejected.push(record);
                }
            }
        }

        if !rejected.is_empty() {
            self.set_aside(&rejected);
        }
        Ok(expenses)
    }

    /// Replace the persisted list
    pub fn try_save(&self, expenses: &[Expense]) -> ExpenseResult<()> {
        write_json_atomic(&self.path, expenses)
    }

    /// Erase the persisted list
    pub fn try_clear(&self) -> ExpenseResult<()> {
        remove_file_if_exists(&self.path)
    }

    /// Load, falling back to an empty list on any failure
    pub fn load(&self) -> Vec<Expense> {
        match self.try_load() {
            Ok(expenses) => {
                tracing::debug!(
                    count = expenses.len(),
                    path = %self.path.display(),
                    "loaded expenses"
                );
                expenses
            }
            Err(err) => {
                tracing::warn!("Error loading expenses, starting empty: {err}");
                self.back_up_unreadable();
                Vec::new()
            }
        }
    }

    /// Save, logging instead of failing
    pub fn save(&self, expenses: &[Expense]) {
        match self.try_save(expenses) {
            Ok(()) => tracing::debug!(
                count = expenses.len(),
                path = %self.path.display(),
                "saved expenses"
            ),
            Err(err) => tracing::error!("Error saving expenses: {err}"),
        }
    }

    /// Clear, logging instead of failing
    pub fn clear(&self) {
        if let Err(err) = self.try_clear() {
            tracing::error!("Error clearing storage: {err}");
        }
    }

    /// Where an unparseable file is copied before it can be overwritten
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    fn back_up_unreadable(&self) {
        let target = self.backup_path();
        match std::fs::copy(&self.path, &target) {
            Ok(_) => tracing::warn!(path = %target.display(), "unreadable expenses file backed up"),
            Err(err) => tracing::error!("Error backing up {}: {err}", self.path.display()),
        }
    }

    fn set_aside(&self, rejected: &[serde_json::Value]) {
        let target = self.rejected_path();
        let mut kept: Vec<serde_json::Value> = match read_json(&target) {
            Ok(previous) => previous,
            Err(err) => {
                tracing::warn!("Error reading {}: {err}", target.display());
                Vec::new()
            }
        };
        for record in rejected {
            if !kept.contains(record) {
                kept.push(record.clone());
            }
        }

        match write_json_atomic(&target, &kept) {
            Ok(()) => tracing::warn!(
                count = rejected.len(),
                path = %target.display(),
                "unreadable expense records set aside"
            ),
            Err(err) => tracing::error!("Error saving rejected expense records: {err}"),
        }
    }
}
