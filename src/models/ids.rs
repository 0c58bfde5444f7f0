//! Expense identifier
//!
//! Manual entries get a random UUID; imported entries keep the bank's own
//! transaction id. The id is the only dedup key, so it is kept as opaque text
//! rather than forcing everything through a UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ExpenseError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an identifier issued elsewhere (e.g. a bank transaction id)
    pub fn from_external(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ExpenseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for ExpenseId {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ExpenseError::Validation("Expense id cannot be empty".into()));
        }
        Ok(Self(s.to_string()))
    }
}
