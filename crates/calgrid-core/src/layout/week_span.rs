//! Week header strip: multi-day bars and floating tasks.
//!
//! Input arrives as one fragment per calendar day an item touches. Fragments
//! are merged back into spans, clipped to the visible week, and each span
//! gets a row so that no two bars in a row share a column.
//!
//! Merging follows the month grid: fragments of one item join when their
//! ranges overlap or touch, repeat occurrences stay one span per occurrence,
//! and every task date is a bar of its own.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::palette::Palette;
use crate::item::SpanRecord;

pub const DAYS_PER_WEEK: usize = 7;

/// Seven consecutive dates starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
}

impl WeekWindow {
    pub fn new(start: NaiveDate) -> Self {
        Self { start }
    }

    /// Last day of the window, saturating at the end of the calendar.
    pub fn end(&self) -> NaiveDate {
        self.offset(DAYS_PER_WEEK - 1)
    }

    pub fn dates(&self) -> [NaiveDate; DAYS_PER_WEEK] {
        std::array::from_fn(|offset| self.offset(offset))
    }

    fn offset(&self, days: usize) -> NaiveDate {
        self.start
            .checked_add_signed(Duration::days(days as i64))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    /// Column of `date`, clamped into `0..=6`.
    pub fn clamped_index(&self, date: NaiveDate) -> usize {
        (date - self.start).num_days().clamp(0, DAYS_PER_WEEK as i64 - 1) as usize
    }
}

/// One bar in the week header strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSpan {
    pub id: String,
    pub title: String,
    pub color: String,
    pub start_idx: usize,
    pub end_idx: usize,
    pub row: usize,
    /// Merged first day, before clipping to the window.
    #[serde(rename = "startISO")]
    pub start_iso: NaiveDate,
    /// Merged last day, before clipping to the window.
    #[serde(rename = "endISO")]
    pub end_iso: NaiveDate,
    pub is_task: bool,
    pub done: bool,
}

impl WeekSpan {
    /// Number of columns the bar covers.
    pub fn width_columns(&self) -> usize {
        self.end_idx - self.start_idx + 1
    }

    pub fn overlaps_columns(&self, other: &Self) -> bool {
        !(self.end_idx < other.start_idx || self.start_idx > other.end_idx)
    }
}

/// Per-day fragments for `record`: one per visible day it covers, plus its
/// true first and last day so the merged range survives clipping.
pub fn expand_fragments(record: &SpanRecord, window: &WeekWindow) -> Vec<(NaiveDate, SpanRecord)> {
    let end = if record.is_task {
        record.start_date
    } else {
        record.end_date
    };
    let mut dates = vec![record.start_date];
    let first_visible = record.start_date.max(window.start);
    let last_visible = end.min(window.end());
    let mut day = first_visible;
    while day <= last_visible {
        if day != record.start_date && day != end {
            dates.push(day);
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    if end != record.start_date {
        dates.push(end);
    }
    dates.into_iter().map(|date| (date, record.clone())).collect()
}

/// Merge fragments into spans and assign header rows.
///
/// Result is ordered by `(row, start_idx, end_idx, id)`.
pub fn build_week_spans(
    window: &WeekWindow,
    fragments: &[(NaiveDate, SpanRecord)],
    palette: &Palette,
) -> Vec<WeekSpan> {
    let mut spans: Vec<WeekSpan> = merge_fragments(fragments)
        .into_iter()
        .filter(|(_, first, last)| *last >= window.start && *first <= window.end())
        .map(|(record, first, last)| WeekSpan {
            color: palette.resolve(record.color_key.as_deref(), record.is_task),
            start_idx: window.clamped_index(first),
            end_idx: window.clamped_index(last),
            row: 0,
            start_iso: first,
            end_iso: last,
            is_task: record.is_task,
            done: record.done,
            id: record.id,
            title: record.title,
        })
        .collect();

    spans.sort_by(|a, b| {
        b.width_columns()
            .cmp(&a.width_columns())
            .then(a.start_idx.cmp(&b.start_idx))
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut rows: Vec<Vec<usize>> = Vec::new();
    for idx in 0..spans.len() {
        let free = rows
            .iter()
            .position(|row| row.iter().all(|&other| !spans[other].overlaps_columns(&spans[idx])));
        let row = match free {
            Some(row) => row,
            None => {
                rows.push(Vec::new());
                rows.len() - 1
            }
        };
        rows[row].push(idx);
        spans[idx].row = row;
    }

    spans.sort_by(|a, b| {
        a.row
            .cmp(&b.row)
            .then(a.start_idx.cmp(&b.start_idx))
            .then(a.end_idx.cmp(&b.end_idx))
            .then_with(|| a.id.cmp(&b.id))
    });
    tracing::debug!(spans = spans.len(), rows = rows.len(), "built week spans");
    spans
}

/// Rejoin fragments into `(record, first day, last day)` spans.
///
/// - A task is one single-day bar per distinct date.
/// - A repeat occurrence is identified by its own date range, so
///   occurrences of one series never join.
/// - Any other item joins fragments whose ranges overlap or touch.
fn merge_fragments(fragments: &[(NaiveDate, SpanRecord)]) -> Vec<(SpanRecord, NaiveDate, NaiveDate)> {
    type Occurrence<'a> = (&'a str, NaiveDate, NaiveDate);

    let mut occurrences: BTreeMap<Occurrence<'_>, (SpanRecord, NaiveDate, NaiveDate)> =
        BTreeMap::new();
    let mut runs: BTreeMap<&str, Vec<(NaiveDate, NaiveDate, &SpanRecord)>> = BTreeMap::new();
    for (date, record) in fragments {
        let id = record.id.as_str();
        if record.is_task {
            occurrences
                .entry((id, *date, *date))
                .or_insert_with(|| (record.clone(), *date, *date));
        } else if record.is_repeat {
            occurrences
                .entry((id, record.start_date, record.end_date))
                .and_modify(|(_, first, last)| {
                    *first = (*first).min(*date);
                    *last = (*last).max(*date);
                })
                .or_insert_with(|| (record.clone(), *date, *date));
        } else {
            let first = record.start_date.min(*date);
            let last = record.end_date.max(*date);
            runs.entry(id).or_default().push((first, last, record));
        }
    }

    let mut merged: Vec<_> = occurrences.into_values().collect();
    for mut pieces in runs.into_values() {
        pieces.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.cmp(&b.1))
                .then_with(|| a.2.title.cmp(&b.2.title))
        });
        let mut current: Option<(SpanRecord, NaiveDate, NaiveDate)> = None;
        for (first, last, record) in pieces {
            match current.as_mut() {
                Some(run) if run.2.succ_opt().map_or(true, |next| first <= next) => {
                    run.2 = run.2.max(last);
                }
                _ => merged.extend(current.replace((record.clone(), first, last))),
            }
        }
        merged.extend(current);
    }
    merged
}
