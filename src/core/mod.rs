//! Rate aggregation and dashboard state

pub mod aggregate;
pub mod config;
pub mod convert;
pub mod currency;
pub mod dashboard;
pub mod error;
pub mod live;
pub mod log;
pub mod range;
pub mod selection;
pub mod sort;
pub mod stats;

// Re-export main types for cleaner imports
pub use aggregate::{RateRow, load_history};
pub use currency::{
    CurrencyCatalog, CurrencyCode, CurrencyNames, CurrencyRateProvider, RateHistoryProvider,
    RateSeries,
};
pub use dashboard::{Action, DashboardState, LoadStatus};
pub use error::DashboardError;
pub use live::{LiveRates, fetch_live_rates};
pub use range::{DateRange, Preset};
pub use selection::CurrencySelection;
pub use sort::{SortColumn, SortDirection, SortState};
