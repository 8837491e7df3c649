//! Public holiday lookup for month cells.
//!
//! Fixed solar-calendar holidays recur every year. Lunar-calendar holidays
//! and substitute days off move, so they come from a precomputed table.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// `(month, day, name)` holidays observed every year.
const FIXED_HOLIDAYS: &[(u32, u32, &str)] = &[
    (1, 1, "New Year's Day"),
    (3, 1, "Independence Movement Day"),
    (5, 5, "Children's Day"),
    (6, 6, "Memorial Day"),
    (8, 15, "Liberation Day"),
    (10, 3, "National Foundation Day"),
    (10, 9, "Hangul Day"),
    (12, 25, "Christmas Day"),
];

/// `(year, month, day, name)` lunar and substitute holidays.
const MOVABLE_HOLIDAYS: &[(i32, u32, u32, &str)] = &[
    (2024, 2, 9, "Seollal"),
    (2024, 2, 10, "Seollal"),
    (2024, 2, 11, "Seollal"),
    (2024, 2, 12, "Substitute Holiday"),
    (2024, 5, 6, "Substitute Holiday"),
    (2024, 5, 15, "Buddha's Birthday"),
    (2024, 9, 16, "Chuseok"),
    (2024, 9, 17, "Chuseok"),
    (2024, 9, 18, "Chuseok"),
    (2024, 10, 1, "Armed Forces Day"),
    (2025, 1, 28, "Seollal"),
    (2025, 1, 29, "Seollal"),
    (2025, 1, 30, "Seollal"),
    (2025, 3, 3, "Substitute Holiday"),
    (2025, 5, 6, "Substitute Holiday"),
    (2025, 10, 5, "Chuseok"),
    (2025, 10, 6, "Chuseok"),
    (2025, 10, 7, "Chuseok"),
    (2025, 10, 8, "Substitute Holiday"),
    (2026, 2, 16, "Seollal"),
    (2026, 2, 17, "Seollal"),
    (2026, 2, 18, "Seollal"),
    (2026, 3, 2, "Substitute Holiday"),
    (2026, 5, 24, "Buddha's Birthday"),
    (2026, 5, 25, "Substitute Holiday"),
    (2026, 8, 17, "Substitute Holiday"),
    (2026, 9, 24, "Chuseok"),
    (2026, 9, 25, "Chuseok"),
    (2026, 9, 26, "Chuseok"),
    (2026, 10, 5, "Substitute Holiday"),
];

/// A user-supplied holiday, e.g. from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub name: String,
}

/// Holiday names by date. Extra entries take precedence over built-ins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    enabled: bool,
    extra: BTreeMap<NaiveDate, String>,
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HolidayCalendar {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            extra: BTreeMap::new(),
        }
    }

    /// A calendar that never reports a holiday.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn with_extra(mut self, entries: impl IntoIterator<Item = HolidayEntry>) -> Self {
        for entry in entries {
            self.extra.insert(entry.date, entry.name);
        }
        self
    }

    pub fn name_for(&self, date: NaiveDate) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        if let Some(name) = self.extra.get(&date) {
            return Some(name.as_str());
        }
        FIXED_HOLIDAYS
            .iter()
            .find(|(m, d, _)| *m == date.month() && *d == date.day())
            .map(|(_, _, name)| *name)
            .or_else(|| {
                MOVABLE_HOLIDAYS
                    .iter()
                    .find(|(y, m, d, _)| *y == date.year() && *m == date.month() && *d == date.day())
                    .map(|(_, _, _, name)| *name)
            })
    }

    /// Every holiday in `year`, in date order.
    pub fn holidays_in(&self, year: i32) -> Vec<HolidayEntry> {
        if !self.enabled {
            return Vec::new();
        }
        let mut dates: Vec<NaiveDate> = FIXED_HOLIDAYS
            .iter()
            .filter_map(|(m, d, _)| NaiveDate::from_ymd_opt(year, *m, *d))
            .chain(
                MOVABLE_HOLIDAYS
                    .iter()
                    .filter(|(y, ..)| *y == year)
                    .filter_map(|(y, m, d, _)| NaiveDate::from_ymd_opt(*y, *m, *d)),
            )
            .chain(self.extra.keys().copied().filter(|date| date.year() == year))
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
            .into_iter()
            .filter_map(|date| {
                self.name_for(date).map(|name| HolidayEntry {
                    date,
                    name: name.to_string(),
                })
            })
            .collect()
    }
}
