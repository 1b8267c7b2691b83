//! Merges per-currency series into date-aligned rows.

use crate::core::currency::{CurrencyCode, RateHistoryProvider, RateSeries};
use crate::core::error::DashboardError;
use crate::core::range::DateRange;
use crate::core::selection::CurrencySelection;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// One day of rates, complete for every currency it was merged from.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub date: NaiveDate,
    rates: BTreeMap<CurrencyCode, f64>,
}

impl RateRow {
    pub fn new(date: NaiveDate, rates: BTreeMap<CurrencyCode, f64>) -> Self {
        RateRow { date, rates }
    }

    pub fn get(&self, code: &CurrencyCode) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn rates(&self) -> &BTreeMap<CurrencyCode, f64> {
        &self.rates
    }
}

// Flat object keyed by lower-case currency code: {"date": .., "usd": ..}
impl Serialize for RateRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rates.len() + 1))?;
        map.serialize_entry("date", &self.date.format("%Y-%m-%d").to_string())?;
        for (code, rate) in &self.rates {
            map.serialize_entry(&code.key(), rate)?;
        }
        map.end()
    }
}

fn is_usable(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Inner join of the series on date. The result is sorted ascending and only
/// holds dates for which every series has a usable rate.
pub fn merge_series(series: &[(CurrencyCode, RateSeries)]) -> Vec<RateRow> {
    let dates: BTreeSet<NaiveDate> = series
        .iter()
        .flat_map(|(_, rates)| rates.keys().copied())
        .collect();

    dates
        .into_iter()
        .filter_map(|date| {
            let rates = series
                .iter()
                .map(|(code, rates)| {
                    rates
                        .get(&date)
                        .copied()
                        .filter(|rate| is_usable(*rate))
                        .map(|rate| (code.clone(), rate))
                })
                .collect::<Option<BTreeMap<_, _>>>()?;
            Some(RateRow::new(date, rates))
        })
        .collect()
}

/// Like [`merge_series`] but an empty result is an error.
pub fn align_series(
    series: &[(CurrencyCode, RateSeries)],
    range: &DateRange,
) -> Result<Vec<RateRow>, DashboardError> {
    let rows = merge_series(series);
    if rows.is_empty() {
        return Err(DashboardError::NoDataInRange {
            start: range.start(),
            end: range.end(),
        });
    }
    Ok(rows)
}

/// Fetches the history of every selected currency concurrently and aligns
/// the results. Any single failure fails the whole load.
#[instrument(name = "LoadHistory", skip(provider, selection, on_progress), fields(range = %range))]
pub async fn load_history(
    provider: &dyn RateHistoryProvider,
    selection: &CurrencySelection,
    range: &DateRange,
    quote: &CurrencyCode,
    on_progress: &(dyn Fn() + Send + Sync),
) -> Result<Vec<RateRow>> {
    let fetches = selection.iter().map(|code| async move {
        let series = provider
            .fetch_history(code.as_str(), quote.as_str(), range)
            .await
            .with_context(|| format!("Failed to fetch {code}/{quote} rates"))?;
        on_progress();
        debug!(%code, days = series.len(), "Fetched rate history");
        Ok::<_, anyhow::Error>((code.clone(), series))
    });

    let series = try_join_all(fetches).await?;
    let rows = align_series(&series, range)?;
    debug!(rows = rows.len(), "Aligned rate history");
    Ok(rows)
}
