//! Expense categories
//!
//! The set is closed: every expense belongs to exactly one of these seven
//! variants. Text from users or old data files is parsed case-insensitively
//! and anything unrecognized is rejected.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExpenseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Bills,
    Shopping,
    Health,
    Other,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Bills,
        Category::Shopping,
        Category::Health,
        Category::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Bills => "Bills",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }

    /// Chart color used by the HTML report
    pub fn color(&self) -> &'static str {
        match self {
            Category::Food => "#FF6384",
            Category::Transport => "#36A2EB",
            Category::Entertainment => "#FFCE56",
            Category::Bills => "#4BC0C0",
            Category::Shopping => "#9966FF",
            Category::Health => "#FF9F40",
            Category::Other => "#C9CBCF",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Category {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                ExpenseError::Validation(format!(
                    "Unknown category '{}'. Expected one of: {}",
                    needle,
                    Category::ALL.map(|c| c.name()).join(", ")
                ))
            })
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
