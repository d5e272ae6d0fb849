//! Availability calendar state model.
//!
//! Pure state-to-state transformer behind the listing availability screen:
//! no I/O, no persistence. Each date resolves to exactly one display status
//! by strict priority: blocked overrides booked, booked overrides any local
//! availability entry, and dates without an entry default to unavailable.
//! Toggling is only permitted in select mode, inside the configured date
//! range, and never on booked or blocked dates; every accepted toggle
//! returns the full updated entry list for the owning caller.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Display status of a single date, in increasing priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// No entry, or a locally toggled-off entry (the default).
    Unavailable,
    /// Locally toggled on.
    Available,
    /// Reserved by a confirmed rental.
    Booked,
    /// Blocked by the host; overrides everything.
    Blocked,
}

/// Interaction mode of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarMode {
    /// Dates can be toggled.
    Select,
    /// Read-only display.
    View,
}

/// A locally edited date: availability flag plus optional nightly price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateEntry {
    pub date: NaiveDate,
    pub available: bool,
    pub price: Option<f64>,
}

/// Static calendar inputs; local edits live in [`AvailabilityCalendar`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarConfig {
    /// First selectable date (inclusive).
    pub min_date: NaiveDate,
    /// Last selectable date (inclusive).
    pub max_date: NaiveDate,
    /// Dates reserved by confirmed rentals.
    pub booked: BTreeSet<NaiveDate>,
    /// Dates blocked by the host.
    pub blocked: BTreeSet<NaiveDate>,
    /// Whether toggling is permitted.
    pub mode: CalendarMode,
    /// Price applied to newly toggled dates.
    pub default_price: Option<f64>,
}

/// Why a toggle was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleRejection {
    ViewMode,
    Blocked,
    Booked,
    OutOfRange,
}

/// Outcome of a toggle attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// The date's entry changed; carries the full updated entry list.
    Changed { entries: Vec<DateEntry> },
    /// No state change.
    Rejected { reason: ToggleRejection },
}

/// Month-grid availability calendar.
#[derive(Debug, Clone)]
pub struct AvailabilityCalendar {
    config: CalendarConfig,
    /// First day of the currently displayed month.
    visible_month: NaiveDate,
    entries: BTreeMap<NaiveDate, DateEntry>,
}

impl AvailabilityCalendar {
    /// Create a calendar displaying the month containing `min_date`.
    pub fn new(config: CalendarConfig) -> Self {
        let visible_month = first_of_month(config.min_date);
        Self {
            config,
            visible_month,
            entries: BTreeMap::new(),
        }
    }

    /// Seed the calendar with previously saved entries.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = DateEntry>) -> Self {
        for entry in entries {
            self.entries.insert(entry.date, entry);
        }
        self
    }

    /// First day of the currently displayed month.
    pub fn visible_month(&self) -> NaiveDate {
        self.visible_month
    }

    /// All local entries in date order.
    pub fn entries(&self) -> Vec<DateEntry> {
        self.entries.values().cloned().collect()
    }

    /// Resolve a date's display status by strict priority.
    pub fn status_of(&self, date: NaiveDate) -> DayStatus {
        if self.config.blocked.contains(&date) {
            return DayStatus::Blocked;
        }
        if self.config.booked.contains(&date) {
            return DayStatus::Booked;
        }
        match self.entries.get(&date) {
            Some(entry) if entry.available => DayStatus::Available,
            _ => DayStatus::Unavailable,
        }
    }

    /// Attempt to toggle a date's availability.
    ///
    /// Flips an existing entry's flag, or inserts a new entry defaulted to
    /// available at the configured default price. The accepted outcome
    /// carries the full updated entry list so the owner can persist it.
    pub fn toggle(&mut self, date: NaiveDate) -> ToggleOutcome {
        if self.config.mode == CalendarMode::View {
            return ToggleOutcome::Rejected {
                reason: ToggleRejection::ViewMode,
            };
        }
        if self.config.blocked.contains(&date) {
            return ToggleOutcome::Rejected {
                reason: ToggleRejection::Blocked,
            };
        }
        if self.config.booked.contains(&date) {
            return ToggleOutcome::Rejected {
                reason: ToggleRejection::Booked,
            };
        }
        if date < self.config.min_date || date > self.config.max_date {
            return ToggleOutcome::Rejected {
                reason: ToggleRejection::OutOfRange,
            };
        }

        self.entries
            .entry(date)
            .and_modify(|entry| entry.available = !entry.available)
            .or_insert(DateEntry {
                date,
                available: true,
                price: self.config.default_price,
            });

        ToggleOutcome::Changed {
            entries: self.entries(),
        }
    }

    /// Advance the displayed month by exactly one calendar month.
    pub fn next_month(&mut self) {
        self.visible_month = self
            .visible_month
            .checked_add_months(Months::new(1))
            .unwrap_or(self.visible_month);
    }

    /// Retreat the displayed month by exactly one calendar month.
    pub fn prev_month(&mut self) {
        self.visible_month = self
            .visible_month
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.visible_month);
    }

    /// The displayed month's dates with their computed statuses.
    pub fn month_grid(&self) -> Vec<(NaiveDate, DayStatus)> {
        let first = self.visible_month;
        let next = first
            .checked_add_months(Months::new(1))
            .unwrap_or(first);
        first
            .iter_days()
            .take_while(|day| *day < next)
            .map(|day| (day, self.status_of(day)))
            .collect()
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
