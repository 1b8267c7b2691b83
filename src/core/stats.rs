//! Per-currency figures derived from the merged rows and live rates.
//!
//! Nothing here is cached: the dashboard recomputes the statistics every
//! time it renders.

use crate::core::aggregate::RateRow;
use crate::core::currency::CurrencyCode;
use crate::core::live::LiveRates;
use crate::core::selection::CurrencySelection;

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyStats {
    pub code: CurrencyCode,
    /// Live rate when available, otherwise the latest historical value.
    pub current: Option<f64>,
    pub is_live: bool,
    pub previous: Option<f64>,
    pub first: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Change of `current` against `previous`, in percent.
    pub change_pct: Option<f64>,
    /// Change of `current` against `first`, in percent.
    pub period_change_pct: Option<f64>,
    pub series: Vec<f64>,
}

/// `(current - reference) / reference * 100`, undefined for a zero reference.
pub fn percent_change(current: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 || !reference.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - reference) / reference * 100.0)
}

pub fn compute_stats(
    selection: &CurrencySelection,
    rows: &[RateRow],
    live: &LiveRates,
) -> Vec<CurrencyStats> {
    let last = rows.last();
    let previous_row = rows.len().checked_sub(2).and_then(|i| rows.get(i));
    let first = rows.first();

    selection
        .iter()
        .map(|code| {
            let live_value = live.get(code).copied();
            let last_value = last.and_then(|r| r.get(code));
            let current = live_value.or(last_value);
            let previous = previous_row.and_then(|r| r.get(code));
            let first = first.and_then(|r| r.get(code));

            let series: Vec<f64> = rows.iter().filter_map(|r| r.get(code)).collect();
            let min = series.iter().copied().reduce(f64::min);
            let max = series.iter().copied().reduce(f64::max);

            CurrencyStats {
                code: code.clone(),
                current,
                is_live: live_value.is_some(),
                previous,
                first,
                min,
                max,
                change_pct: current.zip(previous).and_then(|(c, p)| percent_change(c, p)),
                period_change_pct: current.zip(first).and_then(|(c, f)| percent_change(c, f)),
                series,
            }
        })
        .collect()
}
