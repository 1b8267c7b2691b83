//! Date ranges and the quick-select presets

use crate::core::error::DashboardError;
use chrono::{Duration, NaiveDate};
use std::fmt::Display;
use std::str::FromStr;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// `today - days` up to yesterday. Rates for the current day are
    /// usually not published yet.
    pub fn last_days(days: i64, today: NaiveDate) -> Self {
        let end = today - Duration::days(1);
        let start = (today - Duration::days(days)).min(end);
        DateRange { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Preset {
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Week,
        Preset::Month,
        Preset::Quarter,
        Preset::HalfYear,
        Preset::Year,
    ];

    pub fn days(&self) -> i64 {
        match self {
            Preset::Week => 7,
            Preset::Month => 30,
            Preset::Quarter => 90,
            Preset::HalfYear => 180,
            Preset::Year => 365,
        }
    }

    pub fn range(&self, today: NaiveDate) -> DateRange {
        DateRange::last_days(self.days(), today)
    }

    /// A preset is highlighted when the range starts where the preset would.
    pub fn is_active(&self, range: &DateRange, today: NaiveDate) -> bool {
        range.start() == today - Duration::days(self.days())
    }
}

impl Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Preset::Week => "7D",
                Preset::Month => "30D",
                Preset::Quarter => "90D",
                Preset::HalfYear => "180D",
                Preset::Year => "1Y",
            }
        )
    }
}

impl FromStr for Preset {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "7D" => Ok(Preset::Week),
            "30D" => Ok(Preset::Month),
            "90D" => Ok(Preset::Quarter),
            "180D" => Ok(Preset::HalfYear),
            "1Y" | "365D" => Ok(Preset::Year),
            _ => Err(DashboardError::UnknownPreset(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        let err = DateRange::new(date("2024-02-01"), date("2024-01-01")).unwrap_err();
        assert_eq!(
            err,
            DashboardError::InvalidRange {
                start: date("2024-02-01"),
                end: date("2024-01-01")
            }
        );
        assert!(DateRange::new(date("2024-01-01"), date("2024-01-01")).is_ok());
    }

    #[test]
    fn test_preset_ranges_end_yesterday() {
        let today = date("2024-03-15");
        let month = Preset::Month.range(today);
        assert_eq!(month.start(), date("2024-02-14"));
        assert_eq!(month.end(), date("2024-03-14"));

        let year = Preset::Year.range(today);
        assert_eq!(year.start(), date("2023-03-16"));
        assert_eq!(year.to_string(), "2023-03-16..2024-03-14");
    }

    #[test]
    fn test_preset_is_active() {
        let today = date("2024-03-15");
        let range = Preset::Quarter.range(today);
        assert!(Preset::Quarter.is_active(&range, today));
        assert!(!Preset::Month.is_active(&range, today));
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("7d".parse::<Preset>().unwrap(), Preset::Week);
        assert_eq!("1y".parse::<Preset>().unwrap(), Preset::Year);
        assert_eq!("180D".parse::<Preset>().unwrap(), Preset::HalfYear);
        assert!("2W".parse::<Preset>().is_err());
        for preset in Preset::ALL {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
        }
    }
}
