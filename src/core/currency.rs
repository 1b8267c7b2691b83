//! Currency codes and the rate lookup abstractions

use crate::core::error::DashboardError;
use crate::core::range::DateRange;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// An ISO 4217 style three letter code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Turkish lira, the default quote currency.
    pub fn lira() -> Self {
        CurrencyCode("TRY".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-case form used as the per-currency key of a rate row.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl FromStr for CurrencyCode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(trimmed.to_ascii_uppercase()))
        } else {
            Err(DashboardError::InvalidCurrencyCode(s.to_string()))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Daily rates of one base currency against the quote currency.
pub type RateSeries = BTreeMap<NaiveDate, f64>;

/// Currency code to display name, e.g. `USD` to `United States Dollar`.
pub type CurrencyNames = BTreeMap<String, String>;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Latest point-in-time rate for one unit of `from` expressed in `to`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}

#[async_trait]
pub trait RateHistoryProvider: Send + Sync {
    async fn fetch_history(&self, base: &str, quote: &str, range: &DateRange)
    -> Result<RateSeries>;
}

#[async_trait]
pub trait CurrencyCatalog: Send + Sync {
    async fn currencies(&self) -> Result<CurrencyNames>;
}
