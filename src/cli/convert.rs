use super::ui;
use crate::core::config::AppConfig;
use crate::core::convert::{Conversion, ConversionResult};
use crate::core::{CurrencyCode, CurrencyRateProvider};
use anyhow::{Result, bail};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub amount: f64,
    pub from: Option<CurrencyCode>,
    pub to: Option<CurrencyCode>,
    pub swap: bool,
    pub json: bool,
}

impl ConvertOptions {
    /// `from` defaults to the first configured currency, `to` to the quote
    /// currency. `--swap` is applied after the defaults.
    pub fn conversion(&self, config: &AppConfig) -> Result<Conversion> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            bail!("Amount must be a non-negative number, got {}", self.amount);
        }
        let from = match &self.from {
            Some(code) => code.clone(),
            None => config
                .currencies
                .first()
                .cloned()
                .unwrap_or_else(|| config.quote_currency.clone()),
        };
        let to = self
            .to
            .clone()
            .unwrap_or_else(|| config.quote_currency.clone());

        let mut conversion = Conversion::new(self.amount, from, to);
        if self.swap {
            conversion.swap();
        }
        Ok(conversion)
    }
}

#[derive(Serialize)]
struct ConversionReport<'a> {
    amount: f64,
    from: &'a CurrencyCode,
    to: &'a CurrencyCode,
    rate: f64,
    converted: f64,
}

pub fn format_conversion(
    conversion: &Conversion,
    result: &ConversionResult,
    config: &AppConfig,
) -> String {
    let locale = config.display.locale;
    format!(
        "{} {} = {} {}\n{}",
        ui::format_amount(conversion.amount, locale),
        conversion.from,
        ui::style_text(
            &ui::format_amount(result.converted, locale),
            ui::StyleType::Highlight
        ),
        conversion.to,
        ui::style_text(
            &format!(
                "1 {} = {} {}",
                conversion.from,
                ui::format_amount(result.rate, locale),
                conversion.to
            ),
            ui::StyleType::Subtle
        ),
    )
}

pub async fn run(
    provider: &dyn CurrencyRateProvider,
    config: &AppConfig,
    options: &ConvertOptions,
) -> Result<()> {
    let conversion = options.conversion(config)?;
    info!(
        amount = conversion.amount,
        from = %conversion.from,
        to = %conversion.to,
        "Converting"
    );

    let result = conversion.run(provider).await?;

    if options.json {
        let report = ConversionReport {
            amount: conversion.amount,
            from: &conversion.from,
            to: &conversion.to,
            rate: result.rate,
            converted: result.converted,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_conversion(&conversion, &result, config));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Locale;

    fn code(c: &str) -> CurrencyCode {
        c.parse().unwrap()
    }

    #[test]
    fn test_defaults_come_from_config() {
        let config = AppConfig::default();
        let options = ConvertOptions {
            amount: 100.0,
            ..Default::default()
        };
        let conversion = options.conversion(&config).unwrap();
        assert_eq!(conversion, Conversion::new(100.0, code("USD"), code("TRY")));
    }

    #[test]
    fn test_swap_after_defaults() {
        let config = AppConfig::default();
        let options = ConvertOptions {
            amount: 5.0,
            from: Some(code("GBP")),
            swap: true,
            ..Default::default()
        };
        let conversion = options.conversion(&config).unwrap();
        assert_eq!(conversion.from, code("TRY"));
        assert_eq!(conversion.to, code("GBP"));
    }

    #[test]
    fn test_rejects_negative_amount() {
        let options = ConvertOptions {
            amount: -1.0,
            ..Default::default()
        };
        assert!(options.conversion(&AppConfig::default()).is_err());
    }

    #[test]
    fn test_format_conversion_uses_locale() {
        let mut config = AppConfig::default();
        config.display.locale = Locale::Tr;
        let conversion = Conversion::new(1500.0, code("USD"), code("TRY"));
        let result = ConversionResult {
            rate: 32.5,
            converted: 48750.0,
        };

        let text = console::strip_ansi_codes(&format_conversion(&conversion, &result, &config))
            .to_string();
        assert!(text.contains("1.500,00 USD = 48.750,00 TRY"), "{text}");
        assert!(text.contains("1 USD = 32,50 TRY"), "{text}");
    }
}
