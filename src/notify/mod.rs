//! Spending notifications
//!
//! The store only needs a fire-and-forget hook: it reports a day total that
//! crossed the alert threshold and never waits on or inspects the outcome.
//! Delivery problems stay inside the notifier.

use crate::models::{Category, Money};

/// Day total above which a spending alert is raised
pub const SPENDING_ALERT_THRESHOLD: Money = Money::from_cents(100_00);

/// Title and body of a spending alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendingAlert {
    pub title: String,
    pub body: String,
    pub amount: Money,
    pub category: Option<Category>,
}

impl SpendingAlert {
    pub fn new(amount: Money, category: Option<Category>, currency_symbol: &str) -> Self {
        let title = match category {
            Some(c) => format!("High {} Spending!", c),
            None => "High Spending Alert!".to_string(),
        };
        let scope = match category {
            Some(c) => format!("on {}", c),
            None => "today".to_string(),
        };
        let body = format!(
            "You've spent {} {}. Consider reviewing your budget.",
            amount.format_with_symbol(currency_symbol),
            scope
        );
        Self {
            title,
            body,
            amount,
            category,
        }
    }
}

/// Receiver of spending alerts
pub trait Notifier {
    /// Deliver an alert; implementations swallow their own failures
    fn spending_alert(&self, alert: &SpendingAlert);
}

/// Prints alerts to stderr, or drops them when alerts are turned off
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    enabled: bool,
}

impl ConsoleNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for ConsoleNotifier {
    fn spending_alert(&self, alert: &SpendingAlert) {
        if !self.enabled {
            tracing::debug!(amount = %alert.amount, "spending alerts disabled, dropping alert");
            return;
        }
        tracing::info!(amount = %alert.amount, "spending alert raised");
        eprintln!("{}\n  {}", alert.title, alert.body);
    }
}

/// Keeps every alert in memory so tests can inspect them afterwards
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    alerts: std::sync::Arc<std::sync::Mutex<Vec<SpendingAlert>>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<SpendingAlert> {
        match self.alerts.lock() {
            Ok(alerts) => alerts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn spending_alert(&self, alert: &SpendingAlert) {
        match self.alerts.lock() {
            Ok(mut alerts) => alerts.push(alert.clone()),
            Err(poisoned) => poisoned.into_inner().push(alert.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_alert_text() {
        let alert = SpendingAlert::new(Money::from_cents(12050), None, "$");
        assert_eq!(alert.title, "High Spending Alert!");
        assert_eq!(
            alert.body,
            "You've spent $120.50 today. Consider reviewing your budget."
        );
    }

    #[test]
    fn test_category_alert_text() {
        let alert = SpendingAlert::new(Money::from_cents(30000), Some(Category::Food), "₴");
        assert_eq!(alert.title, "High Food Spending!");
        assert!(alert.body.contains("₴300.00 on Food"));
    }

    #[test]
    fn test_recording_notifier_shares_state_between_clones() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();
        notifier.spending_alert(&SpendingAlert::new(Money::from_cents(1), None, ""));
        assert_eq!(handle.alerts().len(), 1);
    }

    #[test]
    fn test_threshold_is_one_hundred_units() {
        assert_eq!(SPENDING_ALERT_THRESHOLD.to_string(), "100.00");
    }
}
