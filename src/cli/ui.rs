use crate::core::config::Locale;
use chrono::{Datelike, NaiveDate};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Highlight,
    Live,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Highlight => style(text).cyan().bold(),
        StyleType::Live => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// One colour per selected currency, cycled by selection index.
const PALETTE: [(u8, u8, u8); 10] = [
    (0x38, 0xbd, 0xf8),
    (0xc0, 0x84, 0xfc),
    (0x34, 0xd3, 0x99),
    (0xfb, 0xbf, 0x24),
    (0xfb, 0x71, 0x85),
    (0x60, 0xa5, 0xfa),
    (0xa7, 0x8b, 0xfa),
    (0x2d, 0xd4, 0xbf),
    (0xf5, 0x9e, 0x0b),
    (0xec, 0x48, 0x99),
];

// A rising rate means a weaker quote currency, so up is drawn in red.
const RISE: Color = Color::Rgb {
    r: 0xfb,
    g: 0x71,
    b: 0x85,
};
const FALL: Color = Color::Rgb {
    r: 0x34,
    g: 0xd3,
    b: 0x99,
};

pub fn currency_color(index: usize) -> Color {
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    Color::Rgb { r, g, b }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Day-over-day change as `▲ %0.123` or `▼ %0.123`.
pub fn change_cell(change: Option<f64>) -> Cell {
    match change {
        Some(change) if change >= 0.0 => Cell::new(format!("▲ %{:.3}", change.abs()))
            .fg(RISE)
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Some(change) => Cell::new(format!("▼ %{:.3}", change.abs()))
            .fg(FALL)
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        None => na_cell(),
    }
}

/// Rate cell with an arrow relative to the row drawn above it.
pub fn rate_cell(value: f64, above: Option<f64>) -> Cell {
    let text = format!("{value:.4}");
    match above {
        Some(prev) if value > prev => Cell::new(format!("{text} ▲"))
            .fg(RISE)
            .set_alignment(CellAlignment::Right),
        Some(prev) if value < prev => Cell::new(format!("{text} ▼"))
            .fg(FALL)
            .set_alignment(CellAlignment::Right),
        _ => Cell::new(format!("{text}  ")).set_alignment(CellAlignment::Right),
    }
}

pub fn signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

pub fn na_cell() -> Cell {
    Cell::new("N/A")
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

pub fn rise_color() -> Color {
    RISE
}

pub fn fall_color() -> Color {
    FALL
}

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Block-character sparkline scaled between the series min and max.
/// Needs at least two points; longer series are sampled down to `width`.
pub fn sparkline(data: &[f64], width: usize) -> String {
    if data.len() < 2 || width < 2 {
        return String::new();
    }

    let points: Vec<f64> = if data.len() <= width {
        data.to_vec()
    } else {
        (0..width)
            .map(|i| data[i * (data.len() - 1) / (width - 1)])
            .collect()
    };

    let min = points.iter().copied().fold(f64::INFINITY, f64::min);
    let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    points
        .iter()
        .map(|v| {
            if range <= 0.0 {
                BLOCKS[BLOCKS.len() / 2 - 1]
            } else {
                let level = ((v - min) / range * (BLOCKS.len() - 1) as f64).round() as usize;
                BLOCKS[level.min(BLOCKS.len() - 1)]
            }
        })
        .collect()
}

/// Formats an amount with two to four fraction digits and locale specific
/// separators: `1.234,5678` for `tr`, `1,234.5678` for `en`.
pub fn format_amount(value: f64, locale: Locale) -> String {
    let (group_sep, decimal_sep) = match locale {
        Locale::Tr => ('.', ','),
        Locale::En => (',', '.'),
    };

    let fixed = format!("{:.4}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < 2 {
        frac.push('0');
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(digit);
    }

    let is_zero = int_part.chars().chain(frac.chars()).all(|c| c == '0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("{sign}{grouped}{decimal_sep}{frac}")
}

const TR_MONTHS: [&str; 12] = [
    "Oca", "Şub", "Mar", "Nis", "May", "Haz", "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara",
];
const TR_WEEKDAYS: [&str; 7] = ["Paz", "Pzt", "Sal", "Çar", "Per", "Cum", "Cmt"];

/// Short day label such as `05 Oca, Cum`.
pub fn format_day_label(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::Tr => format!(
            "{:02} {}, {}",
            date.day(),
            TR_MONTHS[date.month0() as usize],
            TR_WEEKDAYS[date.weekday().num_days_from_sunday() as usize]
        ),
        Locale::En => date.format("%d %b, %a").to_string(),
    }
}

/// Creates a spinner-style progress bar for concurrent fetches.
pub fn new_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
