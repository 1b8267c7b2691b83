use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::{EndpointConfig, EndpointStyle, FrankfurterConfig};
use crate::core::currency::{
    CurrencyCatalog, CurrencyNames, CurrencyRateProvider, RateHistoryProvider, RateSeries,
};
use crate::core::range::DateRange;
use crate::providers::util::with_fallback;

const USER_AGENT: &str = concat!("fxtry/", env!("CARGO_PKG_VERSION"));

/// Client for the Frankfurter API and its mirrors.
pub struct FrankfurterProvider {
    endpoints: Vec<EndpointConfig>,
    timeout: Duration,
}

impl FrankfurterProvider {
    pub fn new(config: &FrankfurterConfig) -> Self {
        FrankfurterProvider {
            endpoints: config.endpoints.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    fn client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?)
    }

    fn primary(&self) -> Result<&EndpointConfig> {
        self.endpoints
            .first()
            .ok_or_else(|| anyhow!("No Frankfurter endpoint configured"))
    }
}

fn history_url(endpoint: &EndpointConfig, base: &str, quote: &str, range: &DateRange) -> String {
    let query = match endpoint.style {
        EndpointStyle::BaseSymbols => format!("base={base}&symbols={quote}"),
        EndpointStyle::FromTo => format!("from={base}&to={quote}"),
    };
    format!(
        "{}/{}..{}?{}",
        endpoint.base_url.trim_end_matches('/'),
        range.start(),
        range.end(),
        query
    )
}

async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    debug!("Requesting {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "HTTP error: {} for URL: {}",
            response.status(),
            url
        ));
    }

    let text = response.text().await?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse JSON response from {url}"))
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    rates: BTreeMap<String, HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

fn extract_series(response: SeriesResponse, quote: &str) -> RateSeries {
    response
        .rates
        .into_iter()
        .filter_map(|(date_str, quotes)| {
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .map_err(|e| debug!("Skipping unparseable date '{}': {}", date_str, e))
                .ok()?;
            quotes.get(quote).map(|rate| (date, *rate))
        })
        .collect()
}

#[async_trait]
impl RateHistoryProvider for FrankfurterProvider {
    #[instrument(
        name = "FrankfurterHistory",
        skip_all,
        fields(base = %base, quote = %quote, range = %range)
    )]
    async fn fetch_history(
        &self,
        base: &str,
        quote: &str,
        range: &DateRange,
    ) -> Result<RateSeries> {
        let client = self.client()?;
        let client = &client;
        let series = with_fallback(&self.endpoints, |endpoint| {
            let url = history_url(endpoint, base, quote, range);
            async move {
                let response: SeriesResponse = get_json(client, &url).await?;
                Ok(extract_series(response, quote))
            }
        })
        .await?;

        debug!(days = series.len(), "Received rate history");
        Ok(series)
    }
}

#[async_trait]
impl CurrencyRateProvider for FrankfurterProvider {
    /// Tries the real-time endpoint first, then today's dated rates.
    #[instrument(name = "FrankfurterLatest", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let primary = self.primary()?;
        let base_url = primary.base_url.trim_end_matches('/');
        let today = Local::now().date_naive();
        let urls = [
            format!("{base_url}/latest?from={from}&to={to}"),
            format!("{base_url}/{today}?from={from}&to={to}"),
        ];

        let client = self.client()?;
        let client = &client;
        with_fallback(&urls, |url| async move {
            let response: LatestResponse = get_json(client, url).await?;
            response
                .rates
                .get(to)
                .copied()
                .ok_or_else(|| anyhow!("No {} rate in response from {}", to, url))
        })
        .await
        .with_context(|| format!("No live rate for currency pair: {from}/{to}"))
    }
}

#[async_trait]
impl CurrencyCatalog for FrankfurterProvider {
    async fn currencies(&self) -> Result<CurrencyNames> {
        let primary = self.primary()?;
        let url = format!("{}/currencies", primary.base_url.trim_end_matches('/'));
        let client = self.client()?;
        get_json(&client, &url)
            .await
            .context("Failed to fetch currency list")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn provider_for(server: &MockServer) -> FrankfurterProvider {
        FrankfurterProvider::new(&FrankfurterConfig {
            endpoints: vec![
                EndpointConfig {
                    base_url: format!("{}/v1", server.uri()),
                    style: EndpointStyle::BaseSymbols,
                },
                EndpointConfig {
                    base_url: format!("{}/app", server.uri()),
                    style: EndpointStyle::FromTo,
                },
            ],
            request_timeout_secs: 5,
        })
    }

    fn january() -> DateRange {
        DateRange::new(date("2024-01-01"), date("2024-01-05")).unwrap()
    }

    const SERIES_RESPONSE: &str = r#"{
        "amount": 1.0,
        "base": "USD",
        "start_date": "2024-01-02",
        "end_date": "2024-01-05",
        "rates": {
            "2024-01-02": {"TRY": 29.71},
            "2024-01-03": {"TRY": 29.78},
            "2024-01-04": {"TRY": 29.82},
            "not-a-date": {"TRY": 1.0},
            "2024-01-05": {"EUR": 0.91}
        }
    }"#;

    #[test]
    fn test_history_url_shapes() {
        let range = january();
        let dev = EndpointConfig {
            base_url: "https://api.frankfurter.dev/v1/".to_string(),
            style: EndpointStyle::BaseSymbols,
        };
        let app = EndpointConfig {
            base_url: "https://api.frankfurter.app".to_string(),
            style: EndpointStyle::FromTo,
        };
        assert_eq!(
            history_url(&dev, "USD", "TRY", &range),
            "https://api.frankfurter.dev/v1/2024-01-01..2024-01-05?base=USD&symbols=TRY"
        );
        assert_eq!(
            history_url(&app, "EUR", "TRY", &range),
            "https://api.frankfurter.app/2024-01-01..2024-01-05?from=EUR&to=TRY"
        );
    }

    #[tokio::test]
    async fn test_fetch_history_from_primary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/2024-01-01..2024-01-05"))
            .and(query_param("base", "USD"))
            .and(query_param("symbols", "TRY"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SERIES_RESPONSE))
            .expect(1)
            .mount(&server)
            .await;

        let series = provider_for(&server)
            .fetch_history("USD", "TRY", &january())
            .await
            .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series[&date("2024-01-02")], 29.71);
        assert_eq!(series[&date("2024-01-04")], 29.82);
        assert!(!series.contains_key(&date("2024-01-05")));
    }

    #[tokio::test]
    async fn test_fetch_history_falls_back_to_secondary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/2024-01-01..2024-01-05"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/app/2024-01-01..2024-01-05"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "TRY"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SERIES_RESPONSE))
            .expect(1)
            .mount(&server)
            .await;

        let series = provider_for(&server)
            .fetch_history("USD", "TRY", &january())
            .await
            .unwrap();
        assert_eq!(series.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_history_falls_back_on_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/2024-01-01..2024-01-05"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/app/2024-01-01..2024-01-05"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SERIES_RESPONSE))
            .mount(&server)
            .await;

        let series = provider_for(&server)
            .fetch_history("USD", "TRY", &january())
            .await
            .unwrap();
        assert_eq!(series.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_history_fails_when_all_endpoints_fail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .fetch_history("USD", "TRY", &january())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "All 2 endpoints failed");
        assert!(format!("{err:#}").contains("HTTP error: 500 Internal Server Error"));
    }

    #[tokio::test]
    async fn test_latest_rate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/latest"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "TRY"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"amount":1.0,"base":"USD","date":"2024-01-05","rates":{"TRY":29.95}}"#),
            )
            .mount(&server)
            .await;

        let rate = provider_for(&server).get_rate("USD", "TRY").await.unwrap();
        assert_eq!(rate, 29.95);
    }

    #[tokio::test]
    async fn test_latest_rate_falls_back_to_dated_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/latest"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/v1/\d{4}-\d{2}-\d{2}$"))
            .and(query_param("from", "EUR"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"rates":{"TRY":32.4}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let rate = provider_for(&server).get_rate("EUR", "TRY").await.unwrap();
        assert_eq!(rate, 32.4);
    }

    #[tokio::test]
    async fn test_latest_rate_missing_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates":{}}"#))
            .mount(&server)
            .await;

        let err = provider_for(&server).get_rate("USD", "XYZ").await.unwrap_err();
        assert_eq!(err.to_string(), "No live rate for currency pair: USD/XYZ");
    }

    #[tokio::test]
    async fn test_currency_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/currencies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"EUR":"Euro","TRY":"Turkish Lira","USD":"United States Dollar"}"#,
            ))
            .mount(&server)
            .await;

        let names = provider_for(&server).currencies().await.unwrap();
        assert_eq!(names.len(), 3);
        assert_eq!(names["TRY"], "Turkish Lira");
        assert_eq!(names.keys().next().map(String::as_str), Some("EUR"));
    }
}
