//! The two-field currency converter

use crate::core::currency::{CurrencyCode, CurrencyRateProvider};
use anyhow::Result;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl Conversion {
    pub fn new(amount: f64, from: CurrencyCode, to: CurrencyCode) -> Self {
        Conversion { amount, from, to }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Looks up the rate for this pair and applies it.
    pub async fn run(&self, provider: &dyn CurrencyRateProvider) -> Result<ConversionResult> {
        let rate = resolve_rate(provider, &self.from, &self.to).await?;
        Ok(ConversionResult {
            rate,
            converted: convert(self.amount, rate),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult {
    pub rate: f64,
    pub converted: f64,
}

/// Identical currencies convert at exactly 1 without a lookup.
pub async fn resolve_rate(
    provider: &dyn CurrencyRateProvider,
    from: &CurrencyCode,
    to: &CurrencyCode,
) -> Result<f64> {
    if from == to {
        debug!(%from, "Identity conversion");
        return Ok(1.0);
    }
    provider.get_rate(from.as_str(), to.as_str()).await
}

pub fn convert(amount: f64, rate: f64) -> f64 {
    amount * rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CurrencyRateProvider for CountingProvider {
        async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match (from, to) {
                ("USD", "TRY") => Ok(32.0),
                ("TRY", "USD") => Ok(0.03125),
                _ => Err(anyhow::anyhow!("No rate for {from}/{to}")),
            }
        }
    }

    fn code(c: &str) -> CurrencyCode {
        c.parse().unwrap()
    }

    #[tokio::test]
    async fn test_same_currency_is_identity() {
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
        };
        let result = Conversion::new(123.45, code("EUR"), code("EUR"))
            .run(&provider)
            .await
            .unwrap();
        assert_eq!(result.rate, 1.0);
        assert_eq!(result.converted, 123.45);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_conversion_and_swap() {
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
        };
        let mut conversion = Conversion::new(100.0, code("USD"), code("TRY"));
        let result = conversion.run(&provider).await.unwrap();
        assert_eq!(result.converted, 3200.0);

        conversion.swap();
        assert_eq!(conversion.from, code("TRY"));
        assert_eq!(conversion.to, code("USD"));
        let result = conversion.run(&provider).await.unwrap();
        assert_eq!(result.converted, 3.125);
    }

    #[tokio::test]
    async fn test_missing_rate_is_an_error() {
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
        };
        let result = Conversion::new(1.0, code("GBP"), code("JPY"))
            .run(&provider)
            .await;
        assert_eq!(result.unwrap_err().to_string(), "No rate for GBP/JPY");
    }
}
