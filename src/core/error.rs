//! Domain errors surfaced to the user.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("At least one currency must be selected")]
    EmptySelection,

    #[error("At most {max} currencies can be selected")]
    SelectionFull { max: usize },

    #[error("{0} is the quote currency and cannot be selected")]
    QuoteCurrencySelected(String),

    #[error("Invalid currency code: '{0}'")]
    InvalidCurrencyCode(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("No data found between {start} and {end}")]
    NoDataInRange { start: NaiveDate, end: NaiveDate },

    #[error("Unknown preset: '{0}' (expected one of 7D, 30D, 90D, 180D, 1Y)")]
    UnknownPreset(String),
}
