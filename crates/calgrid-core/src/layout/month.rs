//! Month grid builder.
//!
//! Produces the 42 day cells of a month view (six week rows, including the
//! trailing and leading days of adjacent months) with every cell's items
//! already stacked:
//!
//! 1. multi-day spans, on lanes assigned once for the whole grid so a span
//!    keeps its lane in every week row it crosses;
//! 2. single-day events, on the lanes right after the day's last span lane;
//! 3. tasks, after the singles, collapsed into a summary when there are
//!    several.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::holiday::HolidayCalendar;
use super::palette::Palette;
use super::week_span::DAYS_PER_WEEK;
use crate::error::ValidationError;
use crate::item::CalendarItem;

pub const GRID_CELLS: usize = 42;

/// Which month to build and which cells to flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRequest {
    first_of_month: NaiveDate,
    pub today: NaiveDate,
    pub focused: Option<NaiveDate>,
    pub week_start: Weekday,
}

impl MonthRequest {
    /// # Errors
    /// Returns an error if `year`/`month` do not name a calendar month, or if
    /// the 42-cell grid around it runs off either end of the calendar.
    pub fn new(year: i32, month: u32, today: NaiveDate) -> Result<Self, ValidationError> {
        let first_of_month =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| ValidationError::InvalidValue {
                field: "month".into(),
                message: format!("{year}-{month:02} is not a calendar month"),
            })?;
        // Any week start puts the grid within 6 days before the 1st.
        let lead = Duration::days(DAYS_PER_WEEK as i64 - 1);
        let span = Duration::days(GRID_CELLS as i64 - 1);
        let representable = first_of_month
            .checked_sub_signed(lead)
            .and_then(|_| first_of_month.checked_add_signed(span))
            .is_some();
        if !representable {
            return Err(ValidationError::InvalidValue {
                field: "month".into(),
                message: format!("{year}-{month:02} grid runs past the supported date range"),
            });
        }
        Ok(Self {
            first_of_month,
            today,
            focused: None,
            week_start: Weekday::Sun,
        })
    }

    pub fn with_focus(mut self, focused: NaiveDate) -> Self {
        self.focused = Some(focused);
        self
    }

    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn first_of_month(&self) -> NaiveDate {
        self.first_of_month
    }

    /// First cell: the `week_start` weekday on or before the 1st.
    pub fn grid_start(&self) -> NaiveDate {
        let back = (7 + self.first_of_month.weekday().num_days_from_sunday()
            - self.week_start.num_days_from_sunday())
            % 7;
        self.first_of_month - Duration::days(i64::from(back))
    }

    pub fn grid_dates(&self) -> [NaiveDate; GRID_CELLS] {
        let start = self.grid_start();
        std::array::from_fn(|offset| start + Duration::days(offset as i64))
    }

    fn is_current_month(&self, date: NaiveDate) -> bool {
        date.year() == self.first_of_month.year() && date.month() == self.first_of_month.month()
    }
}

/// One entry of a cell's schedule stack. `schedules[i].lane() == i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScheduleSlot {
    /// A multi-day bar drawn from this cell to the right.
    SpanBar {
        lane: usize,
        span_days: usize,
        starts_before: bool,
        ends_after: bool,
        color: String,
        item: CalendarItem,
    },
    /// Cell covered by a bar drawn from an earlier cell in the same row.
    SpanSpacer { lane: usize, id: String },
    /// Span lane with nothing on this day.
    Empty { lane: usize },
    Single {
        lane: usize,
        color: String,
        item: CalendarItem,
    },
}

impl ScheduleSlot {
    pub fn lane(&self) -> usize {
        match self {
            Self::SpanBar { lane, .. }
            | Self::SpanSpacer { lane, .. }
            | Self::Empty { lane }
            | Self::Single { lane, .. } => *lane,
        }
    }

    /// Id of the item occupying the slot, if any.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Self::SpanBar { item, .. } | Self::Single { item, .. } => Some(&item.id),
            Self::SpanSpacer { id, .. } => Some(id),
            Self::Empty { .. } => None,
        }
    }
}

/// Several tasks on one day shown as one box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub count: usize,
    pub all_completed: bool,
    pub tasks: Vec<CalendarItem>,
}

impl TaskSummary {
    fn new(tasks: Vec<CalendarItem>) -> Self {
        Self {
            count: tasks.len(),
            all_completed: tasks.iter().all(|t| t.completed),
            tasks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TaskSlot {
    Task { lane: usize, item: CalendarItem },
    Summary { lane: usize, summary: TaskSummary },
}

impl TaskSlot {
    pub fn lane(&self) -> usize {
        match self {
            Self::Task { lane, .. } | Self::Summary { lane, .. } => *lane,
        }
    }
}

/// A render-ready month cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDateItem {
    pub date: NaiveDate,
    pub day: u32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_focused: bool,
    pub holiday_name: Option<String>,
    pub schedules: Vec<ScheduleSlot>,
    pub tasks: Vec<TaskSlot>,
}

/// Build the 42 cells of the requested month.
pub fn build_month(
    request: &MonthRequest,
    items: &[CalendarItem],
    holidays: &HolidayCalendar,
    palette: &Palette,
) -> Vec<CalendarDateItem> {
    let dates = request.grid_dates();
    let (grid_start, grid_end) = (dates[0], dates[GRID_CELLS - 1]);

    let mut spans = Vec::new();
    let mut singles: BTreeMap<NaiveDate, Vec<CalendarItem>> = BTreeMap::new();
    let mut tasks: BTreeMap<NaiveDate, Vec<CalendarItem>> = BTreeMap::new();
    for item in merge_fragments(items) {
        if item.is_task {
            tasks.entry(item.start_date).or_default().push(item);
        } else if item.is_multi_day() {
            if item.start_date <= grid_end && item.end_date >= grid_start {
                spans.push(item);
            }
        } else {
            singles.entry(item.start_date).or_default().push(item);
        }
    }
    for bucket in singles.values_mut().chain(tasks.values_mut()) {
        bucket.sort_by(|a, b| {
            a.sort_minute()
                .cmp(&b.sort_minute())
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
    }

    let lanes = assign_span_lanes(&spans);
    tracing::debug!(
        spans = spans.len(),
        lanes = lanes.iter().max().map_or(0, |l| l + 1),
        "assigned month span lanes"
    );

    dates
        .iter()
        .enumerate()
        .map(|(cell, &date)| {
            let column = cell % DAYS_PER_WEEK;
            let mut schedules = span_slots(date, column, &spans, &lanes, palette);

            let day_singles = singles.get(&date).map(Vec::as_slice).unwrap_or_default();
            for item in day_singles {
                schedules.push(ScheduleSlot::Single {
                    lane: schedules.len(),
                    color: palette.resolve(item.color_key.as_deref(), false),
                    item: item.clone(),
                });
            }

            let task_lane = schedules.len();
            let day_tasks = tasks.get(&date).cloned().unwrap_or_default();
            let task_slots = match day_tasks.len() {
                0 => Vec::new(),
                1 => day_tasks
                    .into_iter()
                    .map(|item| TaskSlot::Task {
                        lane: task_lane,
                        item,
                    })
                    .collect(),
                _ => vec![TaskSlot::Summary {
                    lane: task_lane,
                    summary: TaskSummary::new(day_tasks),
                }],
            };

            CalendarDateItem {
                date,
                day: date.day(),
                is_current_month: request.is_current_month(date),
                is_today: date == request.today,
                is_focused: request.focused == Some(date),
                holiday_name: holidays.name_for(date).map(str::to_string),
                schedules,
                tasks: task_slots,
            }
        })
        .collect()
}

/// Span lanes for one cell, indexed by lane up to the highest active one.
fn span_slots(
    date: NaiveDate,
    column: usize,
    spans: &[CalendarItem],
    lanes: &[usize],
    palette: &Palette,
) -> Vec<ScheduleSlot> {
    let active: BTreeMap<usize, &CalendarItem> = spans
        .iter()
        .zip(lanes)
        .filter(|(span, _)| span.covers(date))
        .map(|(span, &lane)| (lane, span))
        .collect();
    let Some(&top) = active.keys().next_back() else {
        return Vec::new();
    };

    (0..=top)
        .map(|lane| match active.get(&lane) {
            Some(span) if column == 0 || span.start_date == date => {
                let remaining_in_span = (span.end_date - date).num_days() as usize + 1;
                let remaining_in_row = DAYS_PER_WEEK - column;
                ScheduleSlot::SpanBar {
                    lane,
                    span_days: remaining_in_span.min(remaining_in_row),
                    starts_before: span.start_date < date,
                    ends_after: remaining_in_span > remaining_in_row,
                    color: palette.resolve(span.color_key.as_deref(), false),
                    item: (*span).clone(),
                }
            }
            Some(span) => ScheduleSlot::SpanSpacer {
                lane,
                id: span.id.clone(),
            },
            None => ScheduleSlot::Empty { lane },
        })
        .collect()
}

/// Greedy first-fit over the whole grid, longest span first.
fn assign_span_lanes(spans: &[CalendarItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&spans[a], &spans[b]);
        b.duration_days()
            .cmp(&a.duration_days())
            .then(a.start_date.cmp(&b.start_date))
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut occupants: Vec<Vec<usize>> = Vec::new();
    let mut lanes = vec![0; spans.len()];
    for idx in order {
        let span = &spans[idx];
        let free = occupants.iter().position(|lane| {
            lane.iter().all(|&other| {
                let other = &spans[other];
                other.end_date < span.start_date || other.start_date > span.end_date
            })
        });
        let lane = free.unwrap_or_else(|| {
            occupants.push(Vec::new());
            occupants.len() - 1
        });
        occupants[lane].push(idx);
        lanes[idx] = lane;
    }
    lanes
}

/// Rejoin per-cell fragments of the same event.
///
/// Non-repeating events sharing an id are merged when their ranges overlap
/// or touch. Tasks and repeat occurrences legitimately share ids across
/// days and pass through unchanged.
fn merge_fragments(items: &[CalendarItem]) -> Vec<CalendarItem> {
    let mut passthrough = Vec::new();
    let mut by_id: BTreeMap<&str, Vec<&CalendarItem>> = BTreeMap::new();
    for item in items {
        if item.is_task || item.is_repeat {
            passthrough.push(item.clone());
        } else {
            by_id.entry(item.id.as_str()).or_default().push(item);
        }
    }

    let mut merged = passthrough;
    for mut fragments in by_id.into_values() {
        fragments.sort_by_key(|f| (f.start_date, f.end_date));
        let mut current: Option<CalendarItem> = None;
        for fragment in fragments {
            match current.as_mut() {
                Some(run)
                    if run
                        .end_date
                        .succ_opt()
                        .map_or(true, |next| fragment.start_date <= next) =>
                {
                    run.end_date = run.end_date.max(fragment.end_date);
                }
                _ => merged.extend(current.replace(fragment.clone())),
            }
        }
        merged.extend(current);
    }
    merged
}
