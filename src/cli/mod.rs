//! Terminal front end: option handling, rendering and the command runners.

pub mod convert;
pub mod currencies;
pub mod dashboard;
pub mod rates;
pub mod setup;
pub mod ui;
pub mod watch;

use crate::core::config::AppConfig;
use crate::core::{
    Action, CurrencyCode, CurrencySelection, DashboardError, DashboardState, DateRange, Preset,
    SortColumn, SortDirection,
};
use chrono::{Duration, NaiveDate};

/// Range, currency and sort options shared by `rates` and `watch`.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub preset: Option<Preset>,
    pub currencies: Vec<CurrencyCode>,
    pub sort: Option<SortColumn>,
    pub descending: bool,
    pub json: bool,
}

const DEFAULT_RANGE_DAYS: i64 = 30;

impl ViewOptions {
    pub fn range(&self, today: NaiveDate) -> Result<DateRange, DashboardError> {
        if let Some(preset) = self.preset {
            return Ok(preset.range(today));
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            (Some(start), None) => DateRange::new(start, today - Duration::days(1)),
            (None, Some(end)) => DateRange::new(end - Duration::days(DEFAULT_RANGE_DAYS), end),
            (None, None) => Ok(DateRange::last_days(DEFAULT_RANGE_DAYS, today)),
        }
    }

    pub fn selection(&self, config: &AppConfig) -> Result<CurrencySelection, DashboardError> {
        let codes = if self.currencies.is_empty() {
            &config.currencies
        } else {
            &self.currencies
        };
        if codes.contains(&config.quote_currency) {
            return Err(DashboardError::QuoteCurrencySelected(
                config.quote_currency.to_string(),
            ));
        }
        CurrencySelection::new(codes.iter().cloned())
    }

    pub fn initial_state(
        &self,
        config: &AppConfig,
        today: NaiveDate,
    ) -> Result<DashboardState, DashboardError> {
        Ok(DashboardState::new(
            config.quote_currency.clone(),
            self.range(today)?,
            self.selection(config)?,
        ))
    }

    /// Applies `--sort`/`--desc` on top of the default newest-first order.
    pub fn apply_sort(&self, state: &mut DashboardState, today: NaiveDate) {
        let Some(column) = self.sort.clone() else {
            return;
        };
        state.apply(Action::Sort(column.clone()), today);
        let is_descending = state.sort().direction == SortDirection::Descending;
        if is_descending != self.descending {
            state.apply(Action::Sort(column), today);
        }
    }
}
