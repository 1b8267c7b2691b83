//! The ordered set of currencies shown on the dashboard.

use crate::core::currency::CurrencyCode;
use crate::core::error::DashboardError;

pub const MAX_SELECTED: usize = 10;

/// Result of toggling a currency in or out of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Removing would leave nothing selected. Selection unchanged.
    RejectedLast,
    /// Adding would exceed [`MAX_SELECTED`]. Selection unchanged.
    RejectedFull,
    /// Adding a selected code or removing an unselected one.
    Unchanged,
}

impl ToggleOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, ToggleOutcome::Added | ToggleOutcome::Removed)
    }
}

/// Insertion-ordered, duplicate-free list holding between 1 and
/// [`MAX_SELECTED`] codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencySelection {
    codes: Vec<CurrencyCode>,
}

impl CurrencySelection {
    pub fn new(codes: impl IntoIterator<Item = CurrencyCode>) -> Result<Self, DashboardError> {
        let mut unique: Vec<CurrencyCode> = Vec::new();
        for code in codes {
            if !unique.contains(&code) {
                unique.push(code);
            }
        }

        if unique.is_empty() {
            return Err(DashboardError::EmptySelection);
        }
        if unique.len() > MAX_SELECTED {
            return Err(DashboardError::SelectionFull { max: MAX_SELECTED });
        }
        Ok(CurrencySelection { codes: unique })
    }

    pub fn toggle(&mut self, code: CurrencyCode) -> ToggleOutcome {
        if self.contains(&code) {
            self.remove(&code)
        } else {
            self.add(code)
        }
    }

    /// Adds `code` unless present or full.
    pub fn add(&mut self, code: CurrencyCode) -> ToggleOutcome {
        if self.contains(&code) {
            return ToggleOutcome::Unchanged;
        }
        if self.codes.len() >= MAX_SELECTED {
            return ToggleOutcome::RejectedFull;
        }
        self.codes.push(code);
        ToggleOutcome::Added
    }

    pub fn remove(&mut self, code: &CurrencyCode) -> ToggleOutcome {
        if !self.contains(code) {
            return ToggleOutcome::Unchanged;
        }
        if self.codes.len() <= 1 {
            return ToggleOutcome::RejectedLast;
        }
        self.codes.retain(|c| c != code);
        ToggleOutcome::Removed
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.codes.contains(code)
    }

    pub fn codes(&self) -> &[CurrencyCode] {
        &self.codes
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.codes.iter()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// A selection is never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn remaining(&self) -> usize {
        MAX_SELECTED - self.codes.len()
    }

    pub fn index_of(&self, code: &CurrencyCode) -> Option<usize> {
        self.codes.iter().position(|c| c == code)
    }
}
