//! Near-real-time rates, independent of the historical rows.

use crate::core::currency::{CurrencyCode, CurrencyRateProvider};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, warn};

pub type LiveRates = HashMap<CurrencyCode, f64>;

/// Looks up the latest rate of every code concurrently. Codes whose lookup
/// fails are left out of the map.
pub async fn fetch_live_rates(
    provider: &dyn CurrencyRateProvider,
    codes: &[CurrencyCode],
    quote: &CurrencyCode,
) -> LiveRates {
    let lookups = codes.iter().map(|code| async move {
        let result = provider.get_rate(code.as_str(), quote.as_str()).await;
        (code, result)
    });

    let mut rates = LiveRates::new();
    for (code, result) in join_all(lookups).await {
        match result {
            Ok(rate) if rate.is_finite() && rate > 0.0 => {
                rates.insert(code.clone(), rate);
            }
            Ok(rate) => warn!(%code, rate, "Ignoring unusable live rate"),
            Err(e) => warn!(%code, error = %e, "Live rate unavailable"),
        }
    }
    debug!(count = rates.len(), "Refreshed live rates");
    rates
}
