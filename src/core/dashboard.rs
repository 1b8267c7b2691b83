//! Interactive dashboard state.
//!
//! All transitions are direct assignments driven by user actions or timer
//! ticks. Loads are split into `begin_*` and `finish_*` so the network work
//! can run elsewhere; every load carries a ticket and only the newest ticket
//! may update the state, so a slow response can never overwrite a newer one.

use crate::core::aggregate::RateRow;
use crate::core::currency::CurrencyCode;
use crate::core::error::DashboardError;
use crate::core::live::LiveRates;
use crate::core::range::{DateRange, Preset};
use crate::core::selection::{CurrencySelection, MAX_SELECTED, ToggleOutcome};
use crate::core::sort::{SortColumn, SortState};
use crate::core::stats::{CurrencyStats, compute_stats};
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Sort(SortColumn),
    Toggle(CurrencyCode),
    Add(CurrencyCode),
    Remove(CurrencyCode),
    SetRange(DateRange),
    Preset(Preset),
    Retry,
    RefreshLive,
}

/// Follow-up work requested by an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    pub reload: bool,
    pub refresh_live: bool,
    pub notice: Option<String>,
}

impl Effects {
    fn notice(message: impl Into<String>) -> Self {
        Effects {
            notice: Some(message.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    quote: CurrencyCode,
    range: DateRange,
    selection: CurrencySelection,
    rows: Vec<RateRow>,
    live: LiveRates,
    sort: SortState,
    status: LoadStatus,
    history_generation: u64,
    live_generation: u64,
}

impl DashboardState {
    pub fn new(quote: CurrencyCode, range: DateRange, selection: CurrencySelection) -> Self {
        DashboardState {
            quote,
            range,
            selection,
            rows: Vec::new(),
            live: LiveRates::new(),
            sort: SortState::default(),
            status: LoadStatus::Idle,
            history_generation: 0,
            live_generation: 0,
        }
    }

    pub fn quote(&self) -> &CurrencyCode {
        &self.quote
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn selection(&self) -> &CurrencySelection {
        &self.selection
    }

    pub fn rows(&self) -> &[RateRow] {
        &self.rows
    }

    pub fn live(&self) -> &LiveRates {
        &self.live
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn sorted_rows(&self) -> Vec<&RateRow> {
        self.sort.apply(&self.rows)
    }

    pub fn stats(&self) -> Vec<CurrencyStats> {
        compute_stats(&self.selection, &self.rows, &self.live)
    }

    pub fn selection_hint(&self) -> String {
        match self.selection.remaining() {
            0 => format!("Maximum of {MAX_SELECTED} currencies selected"),
            n => format!("{n} more can be selected"),
        }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.history_generation += 1;
        self.status = LoadStatus::Loading;
        LoadTicket(self.history_generation)
    }

    /// Applies a finished history load. Returns false when a newer load has
    /// started since `ticket` was issued; the result is then discarded.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: anyhow::Result<Vec<RateRow>>) -> bool {
        if ticket.0 != self.history_generation {
            debug!(?ticket, current = self.history_generation, "Discarding stale history");
            return false;
        }
        match result {
            Ok(rows) => {
                self.rows = rows;
                self.sort = SortState::default();
                self.status = LoadStatus::Idle;
            }
            Err(e) => {
                self.status = LoadStatus::Failed(format!("{e:#}"));
            }
        }
        true
    }

    pub fn begin_live(&mut self) -> LoadTicket {
        self.live_generation += 1;
        LoadTicket(self.live_generation)
    }

    pub fn finish_live(&mut self, ticket: LoadTicket, rates: LiveRates) -> bool {
        if ticket.0 != self.live_generation {
            debug!(?ticket, current = self.live_generation, "Discarding stale live rates");
            return false;
        }
        self.live = rates
            .into_iter()
            .filter(|(code, _)| self.selection.contains(code))
            .collect();
        true
    }

    pub fn apply(&mut self, action: Action, today: NaiveDate) -> Effects {
        match action {
            Action::Sort(column) => {
                if let SortColumn::Currency(code) = &column
                    && !self.selection.contains(code)
                {
                    return Effects::notice(format!("Cannot sort by {code}: it is not selected"));
                }
                self.sort.toggle(column);
                Effects::default()
            }
            Action::Toggle(code) | Action::Add(code) if code == self.quote => {
                let error = DashboardError::QuoteCurrencySelected(code.to_string());
                Effects::notice(error.to_string())
            }
            Action::Toggle(code) => {
                let outcome = self.selection.toggle(code.clone());
                self.selection_changed(outcome, &code)
            }
            Action::Add(code) => {
                let outcome = self.selection.add(code.clone());
                self.selection_changed(outcome, &code)
            }
            Action::Remove(code) => {
                if !self.selection.contains(&code) {
                    return Effects::notice(format!("{code} is not selected"));
                }
                let outcome = self.selection.remove(&code);
                self.selection_changed(outcome, &code)
            }
            Action::SetRange(range) => self.range_changed(range),
            Action::Preset(preset) => self.range_changed(preset.range(today)),
            Action::Retry => Effects {
                reload: true,
                refresh_live: true,
                notice: None,
            },
            Action::RefreshLive => Effects {
                refresh_live: true,
                ..Default::default()
            },
        }
    }

    fn range_changed(&mut self, range: DateRange) -> Effects {
        if range == self.range {
            return Effects::default();
        }
        self.range = range;
        Effects {
            reload: true,
            ..Default::default()
        }
    }

    fn selection_changed(&mut self, outcome: ToggleOutcome, code: &CurrencyCode) -> Effects {
        match outcome {
            ToggleOutcome::RejectedLast => {
                Effects::notice("At least one currency must stay selected")
            }
            ToggleOutcome::RejectedFull => Effects::notice(format!(
                "Cannot add {code}: maximum of {MAX_SELECTED} currencies selected"
            )),
            ToggleOutcome::Unchanged => Effects::default(),
            ToggleOutcome::Added | ToggleOutcome::Removed => {
                self.live.retain(|c, _| self.selection.contains(c));
                if let SortColumn::Currency(sorted_by) = &self.sort.column
                    && !self.selection.contains(sorted_by)
                {
                    self.sort = SortState::default();
                }
                Effects {
                    reload: true,
                    refresh_live: true,
                    notice: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sort::SortDirection;
    use anyhow::anyhow;
    use std::collections::BTreeMap;

    fn code(c: &str) -> CurrencyCode {
        c.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn state(codes: &[&str]) -> DashboardState {
        let selection = CurrencySelection::new(codes.iter().map(|c| code(c))).unwrap();
        let range = DateRange::new(date("2024-01-01"), date("2024-01-31")).unwrap();
        DashboardState::new(code("TRY"), range, selection)
    }

    fn rows(usd: &[f64]) -> Vec<RateRow> {
        usd.iter()
            .enumerate()
            .map(|(i, v)| {
                RateRow::new(
                    NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1).unwrap(),
                    BTreeMap::from([(code("USD"), *v)]),
                )
            })
            .collect()
    }

    #[test]
    fn test_stale_history_is_discarded() {
        let mut state = state(&["USD"]);
        let first = state.begin_load();
        let second = state.begin_load();

        assert!(state.finish_load(second, Ok(rows(&[30.0, 31.0]))));
        assert!(!state.finish_load(first, Ok(rows(&[1.0]))));

        assert_eq!(state.rows().len(), 2);
        assert_eq!(state.status(), &LoadStatus::Idle);
    }

    #[test]
    fn test_failed_load_keeps_previous_rows() {
        let mut state = state(&["USD"]);
        let ticket = state.begin_load();
        state.finish_load(ticket, Ok(rows(&[30.0])));

        let ticket = state.begin_load();
        assert_eq!(state.status(), &LoadStatus::Loading);
        state.finish_load(ticket, Err(anyhow!("All 2 endpoints failed")));

        assert_eq!(
            state.status(),
            &LoadStatus::Failed("All 2 endpoints failed".to_string())
        );
        assert_eq!(state.rows().len(), 1);
    }

    #[test]
    fn test_successful_load_resets_sort() {
        let mut state = state(&["USD"]);
        state.apply(Action::Sort(SortColumn::Currency(code("USD"))), date("2024-02-01"));
        assert_eq!(state.sort().direction, SortDirection::Ascending);

        let ticket = state.begin_load();
        state.finish_load(ticket, Ok(rows(&[30.0])));
        assert_eq!(state.sort(), &SortState::default());
    }

    #[test]
    fn test_stale_live_rates_are_discarded() {
        let mut state = state(&["USD", "EUR"]);
        let old = state.begin_live();
        let new = state.begin_live();

        assert!(state.finish_live(new, LiveRates::from([(code("USD"), 32.0)])));
        assert!(!state.finish_live(old, LiveRates::from([(code("USD"), 1.0)])));
        assert_eq!(state.live()[&code("USD")], 32.0);
    }

    #[test]
    fn test_live_rates_limited_to_selection() {
        let mut state = state(&["USD"]);
        let ticket = state.begin_live();
        state.finish_live(
            ticket,
            LiveRates::from([(code("USD"), 32.0), (code("GBP"), 41.0)]),
        );
        assert_eq!(state.live().len(), 1);
    }

    #[test]
    fn test_toggle_triggers_reload_and_live_refresh() {
        let mut state = state(&["USD", "EUR"]);
        let effects = state.apply(Action::Toggle(code("GBP")), date("2024-02-01"));
        assert!(effects.reload);
        assert!(effects.refresh_live);
        assert_eq!(state.selection().len(), 3);
        assert_eq!(state.selection_hint(), "7 more can be selected");
    }

    #[test]
    fn test_removing_last_currency_is_rejected() {
        let mut state = state(&["USD", "EUR"]);
        let effects = state.apply(Action::Remove(code("EUR")), date("2024-02-01"));
        assert!(effects.reload);

        let effects = state.apply(Action::Remove(code("USD")), date("2024-02-01"));
        assert!(!effects.reload);
        assert_eq!(
            effects.notice.as_deref(),
            Some("At least one currency must stay selected")
        );
        assert_eq!(state.selection().codes(), &[code("USD")]);
    }

    #[test]
    fn test_removing_sorted_currency_resets_sort() {
        let mut state = state(&["USD", "EUR"]);
        let today = date("2024-02-01");
        state.apply(Action::Sort(SortColumn::Currency(code("EUR"))), today);
        let ticket = state.begin_live();
        state.finish_live(ticket, LiveRates::from([(code("EUR"), 35.0)]));

        state.apply(Action::Remove(code("EUR")), today);
        assert_eq!(state.sort(), &SortState::default());
        assert!(state.live().is_empty());
    }

    #[test]
    fn test_quote_currency_cannot_be_selected() {
        let mut state = state(&["USD", "EUR"]);
        let today = date("2024-02-01");

        for action in [Action::Toggle(code("TRY")), Action::Add(code("TRY"))] {
            let effects = state.apply(action, today);
            assert!(!effects.reload);
            assert!(!effects.refresh_live);
            assert_eq!(
                effects.notice.as_deref(),
                Some("TRY is the quote currency and cannot be selected")
            );
            assert_eq!(state.selection().codes(), &[code("USD"), code("EUR")]);
        }
    }

    #[test]
    fn test_sort_by_unselected_currency_is_rejected() {
        let mut state = state(&["USD"]);
        let effects = state.apply(
            Action::Sort(SortColumn::Currency(code("GBP"))),
            date("2024-02-01"),
        );
        assert_eq!(
            effects.notice.as_deref(),
            Some("Cannot sort by GBP: it is not selected")
        );
        assert_eq!(state.sort(), &SortState::default());
    }

    #[test]
    fn test_add_existing_currency_does_nothing() {
        let mut state = state(&["USD"]);
        let effects = state.apply(Action::Add(code("USD")), date("2024-02-01"));
        assert_eq!(effects, Effects::default());
    }

    #[test]
    fn test_preset_changes_range() {
        let mut state = state(&["USD"]);
        let today = date("2024-03-15");
        let effects = state.apply(Action::Preset(Preset::Week), today);
        assert!(effects.reload);
        assert!(!effects.refresh_live);
        assert_eq!(state.range().start(), date("2024-03-08"));
        assert_eq!(state.range().end(), date("2024-03-14"));

        let effects = state.apply(Action::Preset(Preset::Week), today);
        assert!(!effects.reload);
    }
}
