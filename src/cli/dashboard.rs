//! Renders the dashboard: header, rate cards, historical table and footer.

use super::ui;
use crate::core::config::DisplayConfig;
use crate::core::stats::CurrencyStats;
use crate::core::{DashboardState, LoadStatus, Preset, SortColumn};
use chrono::NaiveDate;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

/// Header with the quote currency, range, presets and selection size.
pub fn render_header(state: &DashboardState, today: NaiveDate) -> String {
    let presets: Vec<String> = Preset::ALL
        .iter()
        .map(|preset| {
            let label = preset.to_string();
            if preset.is_active(state.range(), today) {
                ui::style_text(&format!("[{label}]"), ui::StyleType::Highlight)
            } else {
                ui::style_text(&label, ui::StyleType::Subtle)
            }
        })
        .collect();

    let codes: Vec<&str> = state.selection().iter().map(|c| c.as_str()).collect();

    format!(
        "{}  {}\n{} {}   {}\n{} ({}/{}) {}  {}",
        ui::style_text(
            &format!("Exchange rates → {}", state.quote()),
            ui::StyleType::Title
        ),
        ui::style_text("Frankfurter API", ui::StyleType::Subtle),
        ui::style_text("Range:", ui::StyleType::Label),
        state.range(),
        presets.join(" "),
        ui::style_text("Currencies", ui::StyleType::Label),
        state.selection().len(),
        crate::core::selection::MAX_SELECTED,
        codes.join(", "),
        ui::style_text(&state.selection_hint(), ui::StyleType::Subtle),
    )
}

/// One column per currency with a usable current value.
pub fn render_cards(
    state: &DashboardState,
    stats: &[CurrencyStats],
    display: &DisplayConfig,
) -> Option<Table> {
    let visible: Vec<(usize, &CurrencyStats)> = stats
        .iter()
        .enumerate()
        .filter(|(_, s)| s.current.is_some_and(|v| v > 0.0))
        .collect();
    if state.rows().is_empty() || visible.is_empty() {
        return None;
    }

    let mut table = ui::new_styled_table();
    let mut header = vec![Cell::new("")];
    for (index, s) in &visible {
        let mut label = format!("{} / {}", s.code, state.quote());
        if s.is_live {
            label.push_str(" ● LIVE");
        }
        header.push(
            Cell::new(label)
                .fg(ui::currency_color(*index))
                .add_attribute(Attribute::Bold),
        );
    }
    table.set_header(header);

    let label = |text: &str| Cell::new(text).add_attribute(Attribute::Dim);

    let mut current = vec![label("Rate")];
    let mut change = vec![label("Change")];
    let mut trend = vec![label("Trend")];
    let mut low = vec![label("Low")];
    let mut period = vec![label("Period")];
    let mut high = vec![label("High")];

    for (index, s) in &visible {
        current.push(
            ui::format_optional_cell(s.current, |v| format!("{v:.4}"))
                .add_attribute(Attribute::Bold),
        );
        change.push(ui::change_cell(s.change_pct));
        trend.push(
            Cell::new(ui::sparkline(&s.series, display.sparkline_width))
                .fg(ui::currency_color(*index)),
        );
        low.push(
            ui::format_optional_cell(s.min, |v| format!("↓ {v:.4}")).fg(ui::fall_color()),
        );
        period.push(ui::format_optional_cell(s.period_change_pct, ui::signed_percent));
        high.push(
            ui::format_optional_cell(s.max, |v| format!("↑ {v:.4}")).fg(ui::rise_color()),
        );
    }

    for row in [current, change, trend, low, period, high] {
        table.add_row(row);
    }
    Some(table)
}

/// The historical table in the current sort order.
pub fn render_table(state: &DashboardState, display: &DisplayConfig) -> Table {
    let mut table = ui::new_styled_table();
    let sort = state.sort();
    let arrow = |column: &SortColumn| {
        if &sort.column == column {
            format!(" {}", sort.direction.arrow())
        } else {
            String::new()
        }
    };

    let mut header = vec![ui::header_cell(&format!("Date{}", arrow(&SortColumn::Date)))];
    for (index, code) in state.selection().iter().enumerate() {
        let column = SortColumn::Currency(code.clone());
        header.push(
            Cell::new(format!("{code} / {}{}", state.quote(), arrow(&column)))
                .fg(ui::currency_color(index))
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
        );
    }
    table.set_header(header);

    let rows = state.sorted_rows();
    for (i, row) in rows.iter().enumerate() {
        let above = i.checked_sub(1).map(|j| rows[j]);
        let mut cells = vec![Cell::new(format!(
            "{}  {}",
            row.date,
            ui::style_text(
                &ui::format_day_label(row.date, display.locale),
                ui::StyleType::Subtle
            )
        ))];
        for code in state.selection().iter() {
            let cell = match row.get(code) {
                Some(value) => ui::rate_cell(value, above.and_then(|r| r.get(code))),
                None => ui::na_cell(),
            };
            cells.push(cell);
        }
        table.add_row(cells);
    }
    table
}

pub fn render_footer(state: &DashboardState, display: &DisplayConfig) -> Option<String> {
    let first = state.rows().first()?;
    let last = state.rows().last()?;
    Some(ui::style_text(
        &format!(
            "{} business days · {} – {}",
            state.rows().len(),
            ui::format_day_label(first.date, display.locale),
            ui::format_day_label(last.date, display.locale)
        ),
        ui::StyleType::Subtle,
    ))
}

pub fn render_status(state: &DashboardState) -> Option<String> {
    match state.status() {
        LoadStatus::Idle => None,
        LoadStatus::Loading => Some(ui::style_text("Loading…", ui::StyleType::Subtle)),
        LoadStatus::Failed(message) => Some(ui::style_text(
            &format!("⚠ {message}"),
            ui::StyleType::Error,
        )),
    }
}

/// Full dashboard as a single string.
pub fn render(state: &DashboardState, display: &DisplayConfig, today: NaiveDate) -> String {
    let mut output = render_header(state, today);
    output.push_str("\n\n");

    let stats = state.stats();
    if let Some(cards) = render_cards(state, &stats, display) {
        output.push_str(&cards.to_string());
        output.push_str("\n\n");
    }

    if let Some(status) = render_status(state) {
        output.push_str(&status);
        output.push_str("\n\n");
    }

    if !state.rows().is_empty() {
        output.push_str(&render_table(state, display).to_string());
        if let Some(footer) = render_footer(state, display) {
            output.push('\n');
            output.push_str(&footer);
        }
    } else if state.status() == &LoadStatus::Idle {
        output.push_str(&ui::style_text("No rates loaded yet.", ui::StyleType::Subtle));
    }
    output
}
