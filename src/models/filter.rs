//! View criteria for the expense list
//!
//! A filter is a conjunction of optional criteria; a criterion that is not
//! set imposes no constraint. Filters live only in memory.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

use super::category::Category;
use super::expense::Expense;
use super::money::Money;
use crate::error::ExpenseError;

/// Inclusive time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// From the first instant of `first` to the last millisecond of `last`,
    /// both interpreted as local calendar days
    pub fn local_days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: start_of_local_day(first),
            end: end_of_local_day(last),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Inclusive amount window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRange {
    pub min: Money,
    pub max: Money,
}

impl AmountRange {
    pub fn new(min: Money, max: Money) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, amount: Money) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Quick time-period choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    ThisWeek,
    ThisMonth,
    LastThreeMonths,
    ThisYear,
}

impl DatePreset {
    pub const ALL: [DatePreset; 5] = [
        DatePreset::Today,
        DatePreset::ThisWeek,
        DatePreset::ThisMonth,
        DatePreset::LastThreeMonths,
        DatePreset::ThisYear,
    ];

    /// Days reached back from today
    pub fn days(&self) -> i64 {
        match self {
            DatePreset::Today => 0,
            DatePreset::ThisWeek => 7,
            DatePreset::ThisMonth => 30,
            DatePreset::LastThreeMonths => 90,
            DatePreset::ThisYear => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatePreset::Today => "Today",
            DatePreset::ThisWeek => "This Week",
            DatePreset::ThisMonth => "This Month",
            DatePreset::LastThreeMonths => "Last 3 Months",
            DatePreset::ThisYear => "This Year",
        }
    }

    /// Range ending at the close of `today`
    pub fn range_ending(&self, today: NaiveDate) -> DateRange {
        DateRange::local_days(today - Duration::days(self.days()), today)
    }

    pub fn range(&self) -> DateRange {
        self.range_ending(Local::now().date_naive())
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DatePreset {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(DatePreset::Today),
            "week" => Ok(DatePreset::ThisWeek),
            "month" => Ok(DatePreset::ThisMonth),
            "quarter" | "3months" => Ok(DatePreset::LastThreeMonths),
            "year" => Ok(DatePreset::ThisYear),
            other => Err(ExpenseError::Validation(format!(
                "Unknown period '{}'. Expected today, week, month, quarter or year",
                other
            ))),
        }
    }
}

/// User-selected view criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Exact category match
    pub category: Option<Category>,
    pub date_range: Option<DateRange>,
    /// Case-insensitive substring over description and category name
    pub search_text: Option<String>,
    pub amount_range: Option<AmountRange>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn preset(self, preset: DatePreset) -> Self {
        self.date_range(preset.range())
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn amount_range(mut self, min: Money, max: Money) -> Self {
        self.amount_range = Some(AmountRange::new(min, max));
        self
    }

    /// True when at least one criterion constrains the view
    pub fn is_active(&self) -> bool {
        self.category.is_some()
            || self.date_range.is_some()
            || self.search_needle().is_some()
            || self.amount_range.is_some()
    }

    /// Whether an expense satisfies every present criterion
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = self.category {
            if expense.category != category {
                return false;
            }
        }

        if let Some(range) = &self.date_range {
            if !range.contains(expense.date) {
                return false;
            }
        }

        if let Some(needle) = self.search_needle() {
            let in_description = expense.description.to_lowercase().contains(&needle);
            let in_category = expense.category.name().to_lowercase().contains(&needle);
            if !in_description && !in_category {
                return false;
            }
        }

        if let Some(range) = &self.amount_range {
            if !range.contains(expense.amount) {
                return false;
            }
        }

        true
    }

    // An empty search box means "no search"
    fn search_needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => naive.and_utc(),
    }
}

pub(crate) fn start_of_local_day(day: NaiveDate) -> DateTime<Utc> {
    local_to_utc(day.and_time(NaiveTime::MIN))
}

pub(crate) fn end_of_local_day(day: NaiveDate) -> DateTime<Utc> {
    local_to_utc(day.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::milliseconds(1))
}
