//! Shared filter arguments
//!
//! Every command that shows a subset of expenses takes the same flags; they
//! are turned into an [`ExpenseFilter`] here.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use clap::Args;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::filter::{end_of_local_day, start_of_local_day};
use crate::models::{AmountRange, Category, DatePreset, DateRange, ExpenseFilter, Money};

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only this category
    #[arg(short, long)]
    pub category: Option<Category>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long, conflicts_with = "period")]
    pub from: Option<String>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long, conflicts_with = "period")]
    pub to: Option<String>,

    /// Quick period: today, week, month, quarter, year
    #[arg(short, long)]
    pub period: Option<DatePreset>,

    /// Case-insensitive text in the description or category
    #[arg(short, long)]
    pub search: Option<String>,

    /// Smallest amount to include
    #[arg(long)]
    pub min: Option<String>,

    /// Largest amount to include
    #[arg(long)]
    pub max: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> ExpenseResult<ExpenseFilter> {
        let mut filter = ExpenseFilter::new();

        if let Some(category) = self.category {
            filter = filter.category(category);
        }

        if let Some(preset) = self.period {
            filter = filter.preset(preset);
        } else if self.from.is_some() || self.to.is_some() {
            let from = self.from.as_deref().map(parse_date).transpose()?;
            let to = self.to.as_deref().map(parse_date).transpose()?;
            if let (Some(from), Some(to)) = (from, to) {
                if from > to {
                    return Err(ExpenseError::Validation(format!(
                        "--from {} is after --to {}",
                        from, to
                    )));
                }
            }
            filter = filter.date_range(DateRange::new(
                from.map(start_of_local_day).unwrap_or(DateTime::<Utc>::MIN_UTC),
                to.map(end_of_local_day).unwrap_or(DateTime::<Utc>::MAX_UTC),
            ));
        }

        if let Some(text) = self.search.as_deref() {
            if !text.trim().is_empty() {
                filter = filter.search(text);
            }
        }

        if self.min.is_some() || self.max.is_some() {
            let min = self.min.as_deref().map(parse_amount).transpose()?;
            let max = self.max.as_deref().map(parse_amount).transpose()?;
            let range = AmountRange::new(
                min.unwrap_or_else(Money::zero),
                max.unwrap_or(Money::from_cents(i64::MAX)),
            );
            if range.min > range.max {
                return Err(ExpenseError::Validation(format!(
                    "--min {} is larger than --max {}",
                    range.min, range.max
                )));
            }
            filter.amount_range = Some(range);
        }

        Ok(filter)
    }
}

pub fn parse_date(s: &str) -> ExpenseResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        ExpenseError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", s))
    })
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM` as local time
///
/// A bare date means noon, which keeps the expense on that calendar day in
/// any nearby timezone.
pub fn parse_local_datetime(s: &str) -> ExpenseResult<DateTime<Utc>> {
    let s = s.trim();
    let naive = match NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        Ok(naive) => naive,
        Err(_) => {
            let day = parse_date(s).map_err(|_| {
                ExpenseError::Validation(format!(
                    "Invalid date '{}'. Use YYYY-MM-DD or YYYY-MM-DDTHH:MM",
                    s
                ))
            })?;
            day.and_hms_opt(12, 0, 0)
                .ok_or_else(|| ExpenseError::Validation(format!("Invalid date '{}'", s)))?
        }
    };

    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ExpenseError::Validation(format!("'{}' does not exist in local time", s)))
}

fn parse_amount(s: &str) -> ExpenseResult<Money> {
    Money::parse(s).map_err(|e| ExpenseError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_empty_args_give_inactive_filter() {
        let filter = FilterArgs::default().to_filter().unwrap();
        assert!(!filter.is_active());
    }

    #[test]
    fn test_date_bounds_are_inclusive_days() {
        let args = FilterArgs {
            from: Some("2024-01-01".into()),
            to: Some("2024-01-31".into()),
            ..Default::default()
        };
        let range = args.to_filter().unwrap().date_range.unwrap();

        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(range.start, start_of_local_day(first));
        assert_eq!(range.end, end_of_local_day(last));
    }

    #[test]
    fn test_open_ended_range() {
        let args = FilterArgs {
            from: Some("2024-01-01".into()),
            ..Default::default()
        };
        let range = args.to_filter().unwrap().date_range.unwrap();
        assert!(range.contains(Utc::now()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let args = FilterArgs {
            from: Some("2024-02-01".into()),
            to: Some("2024-01-01".into()),
            ..Default::default()
        };
        assert!(args.to_filter().unwrap_err().is_validation());
    }

    #[test]
    fn test_period_sets_range() {
        let args = FilterArgs {
            period: Some(DatePreset::ThisWeek),
            ..Default::default()
        };
        let range = args.to_filter().unwrap().date_range.unwrap();
        assert!(range.contains(Utc::now()));
        assert!(range.contains(Utc::now() - Duration::days(6)));
        assert!(!range.contains(Utc::now() - Duration::days(9)));
    }

    #[test]
    fn test_amount_bounds() {
        let args = FilterArgs {
            min: Some("10".into()),
            ..Default::default()
        };
        let range = args.to_filter().unwrap().amount_range.unwrap();
        assert_eq!(range.min, Money::from_cents(1000));
        assert!(range.contains(Money::from_cents(1_000_000)));

        let args = FilterArgs {
            min: Some("50".into()),
            max: Some("20".into()),
            ..Default::default()
        };
        assert!(args.to_filter().is_err());

        let args = FilterArgs {
            max: Some("abc".into()),
            ..Default::default()
        };
        assert!(args.to_filter().unwrap_err().is_validation());
    }

    #[test]
    fn test_blank_search_ignored() {
        let args = FilterArgs {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert!(args.to_filter().unwrap().search_text.is_none());
    }

    #[test]
    fn test_parse_local_datetime() {
        let at_noon = parse_local_datetime("2024-05-10").unwrap();
        assert_eq!(
            at_noon.with_timezone(&Local).date_naive(),
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
        );

        let exact = parse_local_datetime("2024-05-10T08:15").unwrap();
        assert_eq!(exact.with_timezone(&Local).format("%H:%M").to_string(), "08:15");

        assert!(parse_local_datetime("10/05/2024").is_err());
    }
}
