//! Input record types consumed by the layout engine.
//!
//! These are the strict shapes the layout functions operate on. Loosely-typed
//! upstream payloads are turned into them by [`crate::adapter`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minutes in a calendar day; also the sort key for items without a time.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A same-day item positioned on a time grid (minutes since midnight).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedItem {
    pub id: String,
    pub title: String,
    pub start_minute: u32,
    /// Exclusive end. `None` for tasks and open-ended events.
    pub end_minute: Option<u32>,
    #[serde(default)]
    pub is_task: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub is_repeat: bool,
}

impl TimedItem {
    /// Create a timed event. An inverted range is stored as given and
    /// rendered as a single block by [`visual_end`](Self::visual_end).
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_minute: u32,
        end_minute: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_minute,
            end_minute: Some(end_minute),
            is_task: false,
            labels: Vec::new(),
            is_repeat: false,
        }
    }

    /// Create a task with a fixed start time and no end.
    pub fn task(id: impl Into<String>, title: impl Into<String>, start_minute: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_minute,
            end_minute: None,
            is_task: true,
            labels: Vec::new(),
            is_repeat: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_repeat(mut self, is_repeat: bool) -> Self {
        self.is_repeat = is_repeat;
        self
    }

    /// End of the block the item occupies on screen.
    ///
    /// Tasks always take `block_minutes`; events with no end, or an end at or
    /// before their start, take one block as well.
    pub fn visual_end(&self, block_minutes: u32) -> u32 {
        let block = block_minutes.max(1);
        if self.is_task {
            return self.start_minute + block;
        }
        match self.end_minute {
            Some(end) if end > self.start_minute => end,
            _ => self.start_minute + block,
        }
    }
}

/// A date-ranged record for the week header strip. Dates are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanRecord {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub color_key: Option<String>,
    #[serde(default)]
    pub is_task: bool,
    #[serde(default)]
    pub done: bool,
    /// One occurrence of a recurring item. Occurrences share the id of
    /// their series and are never merged with each other.
    #[serde(default)]
    pub is_repeat: bool,
}

impl SpanRecord {
    /// Create a span. Inverted ranges are swapped.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let (start_date, end_date) = ordered(start_date, end_date);
        Self {
            id: id.into(),
            title: title.into(),
            start_date,
            end_date,
            color_key: None,
            is_task: false,
            done: false,
            is_repeat: false,
        }
    }

    /// Create a task, which is always a single-day span.
    pub fn task(id: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            is_task: true,
            ..Self::new(id, title, date, date)
        }
    }

    pub fn with_color(mut self, color_key: impl Into<String>) -> Self {
        self.color_key = Some(color_key.into());
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn with_repeat(mut self, is_repeat: bool) -> Self {
        self.is_repeat = is_repeat;
        self
    }

    /// Inclusive length in days.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// An item as the month grid sees it: a date range with an optional start
/// time used only for per-day ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItem {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub start_minute: Option<u32>,
    #[serde(default)]
    pub end_minute: Option<u32>,
    #[serde(default)]
    pub color_key: Option<String>,
    #[serde(default)]
    pub is_task: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_repeat: bool,
}

impl CalendarItem {
    /// Create a dated event. Inverted ranges are swapped.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let (start_date, end_date) = ordered(start_date, end_date);
        Self {
            id: id.into(),
            title: title.into(),
            start_date,
            end_date,
            start_minute: None,
            end_minute: None,
            color_key: None,
            is_task: false,
            completed: false,
            is_repeat: false,
        }
    }

    /// Create a task due on `date`.
    pub fn task(id: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            is_task: true,
            ..Self::new(id, title, date, date)
        }
    }

    pub fn with_time(mut self, start_minute: u32, end_minute: Option<u32>) -> Self {
        self.start_minute = Some(start_minute);
        self.end_minute = end_minute;
        self
    }

    pub fn with_color(mut self, color_key: impl Into<String>) -> Self {
        self.color_key = Some(color_key.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_repeat(mut self, is_repeat: bool) -> Self {
        self.is_repeat = is_repeat;
        self
    }

    /// Multi-day events; tasks never are.
    pub fn is_multi_day(&self) -> bool {
        !self.is_task && self.start_date != self.end_date
    }

    /// Inclusive length in days.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Whether the item covers `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Sort key for per-day stacking: untimed items go last.
    pub fn sort_minute(&self) -> u32 {
        self.start_minute.unwrap_or(MINUTES_PER_DAY)
    }

    /// The time-grid form of this item, if it belongs on a time grid:
    /// a single-day event with a start time, or a task with a start time.
    pub fn to_timed(&self) -> Option<TimedItem> {
        let start_minute = self.start_minute?;
        if self.is_multi_day() {
            return None;
        }
        Some(TimedItem {
            id: self.id.clone(),
            title: self.title.clone(),
            start_minute,
            end_minute: if self.is_task { None } else { self.end_minute },
            is_task: self.is_task,
            labels: Vec::new(),
            is_repeat: self.is_repeat,
        })
    }

    /// The header-strip form of this item.
    pub fn to_span_record(&self) -> SpanRecord {
        SpanRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            start_date: self.start_date,
            end_date: if self.is_task { self.start_date } else { self.end_date },
            color_key: self.color_key.clone(),
            is_task: self.is_task,
            done: self.completed,
            is_repeat: self.is_repeat,
        }
    }
}

fn ordered(a: NaiveDate, b: NaiveDate) -> (NaiveDate, NaiveDate) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn task_occupies_one_block_regardless_of_end() {
        let mut task = TimedItem::task("t", "Write report", 540);
        assert_eq!(task.visual_end(60), 600);
        task.end_minute = Some(545);
        assert_eq!(task.visual_end(60), 600);
    }

    #[test]
    fn zero_length_event_gets_a_block() {
        let event = TimedItem::new("e", "Ping", 600, 600);
        assert_eq!(event.visual_end(60), 660);
        let event = TimedItem::new("e", "Sync", 600, 630);
        assert_eq!(event.visual_end(60), 630);
    }

    #[test]
    fn inverted_dates_are_swapped() {
        let span = SpanRecord::new("s", "Trip", date(2024, 1, 10), date(2024, 1, 3));
        assert_eq!(span.start_date, date(2024, 1, 3));
        assert_eq!(span.duration_days(), 8);
    }

    #[test]
    fn calendar_item_conversions() {
        let timed = CalendarItem::new("a", "Lunch", date(2024, 3, 4), date(2024, 3, 4))
            .with_time(720, Some(780));
        assert_eq!(timed.to_timed().map(|t| t.end_minute), Some(Some(780)));

        let multi = CalendarItem::new("b", "Conference", date(2024, 3, 4), date(2024, 3, 6))
            .with_time(540, None);
        assert!(multi.to_timed().is_none());
        assert_eq!(multi.to_span_record().end_date, date(2024, 3, 6));

        let task = CalendarItem::task("c", "Pay rent", date(2024, 3, 5)).with_completed(true);
        assert!(!task.is_multi_day());
        assert!(task.to_span_record().done);

        let weekly = CalendarItem::new("d", "Yoga", date(2024, 3, 4), date(2024, 3, 4)).with_repeat(true);
        assert!(weekly.to_span_record().is_repeat);
        assert_eq!(task.sort_minute(), MINUTES_PER_DAY);
    }
}
