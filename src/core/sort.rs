//! Single-column sorting of the historical table

use crate::core::aggregate::RateRow;
use crate::core::currency::CurrencyCode;
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortColumn {
    Date,
    Currency(CurrencyCode),
}

impl Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortColumn::Date => f.write_str("date"),
            SortColumn::Currency(code) => write!(f, "{code}"),
        }
    }
}

impl FromStr for SortColumn {
    type Err = crate::core::error::DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("date") {
            return Ok(SortColumn::Date);
        }
        Ok(SortColumn::Currency(s.parse()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// Newest first.
    fn default() -> Self {
        SortState {
            column: SortColumn::Date,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Selecting the active column flips the direction; any other column
    /// becomes active in ascending order.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.flipped();
        } else {
            self.column = column;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Returns the rows in display order. Descending is always the exact
    /// reverse of ascending: equal values are ordered by date.
    pub fn apply<'a>(&self, rows: &'a [RateRow]) -> Vec<&'a RateRow> {
        let mut sorted: Vec<&RateRow> = rows.iter().collect();
        sorted.sort_by(|a, b| self.compare_ascending(a, b));
        if self.direction == SortDirection::Descending {
            sorted.reverse();
        }
        sorted
    }

    fn compare_ascending(&self, a: &RateRow, b: &RateRow) -> Ordering {
        match &self.column {
            SortColumn::Date => a.date.cmp(&b.date),
            SortColumn::Currency(code) => {
                let by_value = match (a.get(code), b.get(code)) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                by_value.then_with(|| a.date.cmp(&b.date))
            }
        }
    }
}
