use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Hourly slots offered on every day of the grid.
pub const TIME_SLOTS: [&str; 9] = [
    "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
];

/// Number of consecutive days shown, starting today.
pub const GRID_DAYS: u64 = 7;

/// Wire format for dates used as availability keys.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A doctor's availability: date key (`YYYY-MM-DD`) to selected slots.
///
/// Saved wholesale; the server copy is overwritten, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability(BTreeMap<String, BTreeSet<String>>);

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, date: &str, slot: &str) -> bool {
        self.0.get(date).is_some_and(|slots| slots.contains(slot))
    }

    /// Flip membership of `slot` on `date`. Returns the new membership.
    ///
    /// Dates left with no slots are dropped so a double toggle yields an
    /// identical map.
    pub fn toggle(&mut self, date: &str, slot: &str) -> bool {
        let slots = self.0.entry(date.to_string()).or_default();
        let selected = if slots.remove(slot) {
            false
        } else {
            slots.insert(slot.to_string());
            true
        };
        if slots.is_empty() {
            self.0.remove(date);
        }
        selected
    }

    pub fn slots_for(&self, date: &str) -> impl Iterator<Item = &str> {
        self.0.get(date).into_iter().flatten().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    /// Total number of selected slots across all dates.
    pub fn slot_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }
}

/// One column of the availability editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityDay {
    pub date: NaiveDate,
    /// Key used in [`Availability`].
    pub key: String,
    pub day_name: String,
    pub label: String,
}

impl AvailabilityDay {
    fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            key: date.format(DATE_KEY_FORMAT).to_string(),
            day_name: date.format("%A").to_string(),
            label: date.format("%-m/%-d/%Y").to_string(),
        }
    }
}

/// Build the editor grid: [`GRID_DAYS`] consecutive days from `today`.
pub fn availability_days(today: NaiveDate) -> Vec<AvailabilityDay> {
    (0..GRID_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(AvailabilityDay::for_date)
        .collect()
}
