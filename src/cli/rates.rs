use super::{ViewOptions, dashboard, ui};
use crate::core::config::AppConfig;
use crate::core::{
    CurrencyCode, CurrencyRateProvider, DashboardState, LoadStatus, RateHistoryProvider, RateRow,
    SortColumn, fetch_live_rates, load_history,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Serialize)]
struct RatesReport<'a> {
    quote: &'a CurrencyCode,
    start: NaiveDate,
    end: NaiveDate,
    rows: Vec<&'a RateRow>,
    live: BTreeMap<&'a CurrencyCode, f64>,
}

/// Loads history and live rates once and prints the dashboard.
pub async fn run(
    history_provider: &dyn RateHistoryProvider,
    rate_provider: &dyn CurrencyRateProvider,
    config: &AppConfig,
    options: &ViewOptions,
    today: NaiveDate,
) -> Result<()> {
    let mut state = options.initial_state(config, today)?;
    if let Some(SortColumn::Currency(code)) = &options.sort
        && !state.selection().contains(code)
    {
        return Err(anyhow!("Cannot sort by {code}: it is not selected"));
    }

    load(&mut state, history_provider, rate_provider).await;

    // The error itself is reported by the caller.
    if let LoadStatus::Failed(message) = state.status() {
        eprintln!(
            "{}",
            ui::style_text(
                "Run the command again or pick a wider range with --preset.",
                ui::StyleType::Subtle
            )
        );
        return Err(anyhow!(message.clone()));
    }

    options.apply_sort(&mut state, today);

    if options.json {
        println!("{}", json_report(&state)?);
    } else {
        println!("{}", dashboard::render(&state, &config.display, today));
    }
    Ok(())
}

/// Fetches history and live rates concurrently and applies both to `state`.
pub async fn load(
    state: &mut DashboardState,
    history_provider: &dyn RateHistoryProvider,
    rate_provider: &dyn CurrencyRateProvider,
) {
    info!(range = %state.range(), currencies = state.selection().len(), "Loading rates");

    let history_ticket = state.begin_load();
    let live_ticket = state.begin_live();

    let pb = ui::new_progress_bar(state.selection().len() as u64);
    let on_progress = || pb.inc(1);
    let (history, live) = tokio::join!(
        load_history(
            history_provider,
            state.selection(),
            state.range(),
            state.quote(),
            &on_progress
        ),
        fetch_live_rates(rate_provider, state.selection().codes(), state.quote()),
    );
    pb.finish_and_clear();

    state.finish_load(history_ticket, history);
    state.finish_live(live_ticket, live);
}

/// The `--json` payload: quote, range, rows in display order and live rates.
pub fn json_report(state: &DashboardState) -> Result<String> {
    let report = RatesReport {
        quote: state.quote(),
        start: state.range().start(),
        end: state.range().end(),
        rows: state.sorted_rows(),
        live: state.live().iter().map(|(code, rate)| (code, *rate)).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
