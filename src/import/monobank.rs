//! Monobank personal API client
//!
//! Two endpoints are used, both authenticated with the `X-Token` header:
//! `GET /personal/client-info` for the account list and
//! `GET /personal/statement/{account}/{from}/{to}` for transactions, with
//! the window given as unix seconds.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;

use super::mcc::category_for_mcc;
use super::BankApi;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseId, Money};

/// Response of `/personal/client-info`; fields we don't use are ignored
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    /// "black", "white", "platinum", "fop", ...
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub currency_code: Option<u16>,
}

impl Account {
    pub fn is_black_card(&self) -> bool {
        self.kind == "black"
    }
}

/// Transaction id as sent by the bank; usually text, tolerated as a number
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Text(s) => f.write_str(s),
            RawId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One line of `/personal/statement`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementItem {
    pub id: RawId,
    /// Unix seconds
    pub time: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mcc: u16,
    /// Minor units, negative for debits
    pub amount: i64,
}

impl StatementItem {
    pub fn is_debit(&self) -> bool {
        self.amount < 0
    }

    /// Map a debit to an expense; credits and unreadable timestamps yield `None`
    pub fn into_expense(self) -> Option<Expense> {
        if !self.is_debit() {
            return None;
        }
        let Some(date) = DateTime::<Utc>::from_timestamp(self.time, 0) else {
            tracing::warn!(
                id = %self.id,
                time = self.time,
                "statement item has invalid time, skipping"
            );
            return None;
        };
        Some(Expense::with_id(
            ExpenseId::from_external(self.id.to_string()),
            Money::from_cents(self.amount.saturating_abs()),
            category_for_mcc(self.mcc),
            self.description,
            date,
        ))
    }
}

/// Statement time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl StatementWindow {
    /// The `days` days ending at `now`
    pub fn last_days(days: u32, now: DateTime<Utc>) -> Self {
        Self {
            from: now - Duration::days(i64::from(days)),
            to: now,
        }
    }
}

/// Path of the statement request for one account
pub fn statement_path(account_id: &str, window: &StatementWindow) -> String {
    format!(
        "personal/statement/{}/{}/{}",
        account_id,
        window.from.timestamp(),
        window.to.timestamp()
    )
}

/// HTTP client for the Monobank API
#[derive(Debug, Clone)]
pub struct MonobankClient {
    base_url: Url,
    token: String,
    http: reqwest::Client,
}

impl MonobankClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> ExpenseResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ExpenseError::Validation("Monobank token is required".into()));
        }

        // a trailing slash keeps any base path when joining endpoints
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|err| ExpenseError::Config(format!("invalid Monobank api_url: {err}")))?;

        Ok(Self {
            base_url,
            token,
            http: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self, path: &str) -> ExpenseResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ExpenseError::Config(format!("invalid endpoint {path}: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ExpenseResult<T> {
        let endpoint = self.endpoint(path)?;
        tracing::debug!(%endpoint, "requesting");

        let res = self
            .http
            .get(endpoint)
            .header("X-Token", &self.token)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ExpenseError::Network(format!(
                "{path} returned {status}: {}",
                body.trim()
            )));
        }

        Ok(res.json::<T>().await?)
    }
}

#[async_trait]
impl BankApi for MonobankClient {
    async fn accounts(&self) -> ExpenseResult<Vec<Account>> {
        let info: ClientInfo = self.get_json("personal/client-info").await?;
        Ok(info.accounts)
    }

    async fn statement(
        &self,
        account_id: &str,
        window: &StatementWindow,
    ) -> ExpenseResult<Vec<StatementItem>> {
        self.get_json(&statement_path(account_id, window)).await
    }
}
