use super::ui;
use crate::core::config::AppConfig;
use crate::core::selection::MAX_SELECTED;
use crate::core::{CurrencyCatalog, CurrencyCode, CurrencyNames, CurrencySelection};
use anyhow::Result;
use comfy_table::{Attribute, Cell, Table};

/// Every catalogue currency except the quote currency, with the current
/// selection marked.
pub fn catalog_table(
    names: &CurrencyNames,
    quote: &CurrencyCode,
    selection: &CurrencySelection,
) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Name"),
    ]);

    for (code, name) in names {
        let Ok(code) = code.parse::<CurrencyCode>() else {
            continue;
        };
        if &code == quote {
            continue;
        }
        let row = match selection.index_of(&code) {
            Some(index) => vec![
                Cell::new("●").fg(ui::currency_color(index)),
                Cell::new(code.as_str())
                    .fg(ui::currency_color(index))
                    .add_attribute(Attribute::Bold),
                Cell::new(name),
            ],
            None => vec![Cell::new(""), Cell::new(code.as_str()), Cell::new(name)],
        };
        table.add_row(row);
    }
    table
}

pub async fn run(catalog: &dyn CurrencyCatalog, config: &AppConfig) -> Result<()> {
    let names = catalog.currencies().await?;
    let selection = CurrencySelection::new(config.currencies.iter().cloned())?;

    println!(
        "{}\n",
        ui::style_text(
            &format!("Available currencies against {}", config.quote_currency),
            ui::StyleType::Title
        )
    );
    println!(
        "{}",
        catalog_table(&names, &config.quote_currency, &selection)
    );
    let hint = match selection.remaining() {
        0 => format!("Maximum of {MAX_SELECTED} currencies selected"),
        n => format!("{n} more can be selected"),
    };
    println!(
        "\n{} ({}/{MAX_SELECTED}) {}",
        ui::style_text("Selected", ui::StyleType::Label),
        selection.len(),
        ui::style_text(&hint, ui::StyleType::Subtle)
    );
    Ok(())
}
