//! Calendar layout engine.
//!
//! This module provides:
//! - Day time-grid overlap resolution (columns within overlap groups)
//! - Week time-grid layout with duplicate and stacked-offset rules
//! - Week header strip span rows
//! - Month grid cells with global span lanes and task summaries
//!
//! Every function here is pure over its inputs; the only carried state is
//! the caller-owned [`WeekLayoutCache`].

pub mod day;
pub mod holiday;
pub mod interval;
pub mod month;
pub mod palette;
pub mod week_span;
pub mod week_timeline;

pub use day::{resolve_day, DayOptions, TimedPlacement};
pub use holiday::{HolidayCalendar, HolidayEntry};
pub use interval::{first_fit_lanes, max_depth, sweep_groups, Extent, Interval};
pub use month::{
    build_month, CalendarDateItem, MonthRequest, ScheduleSlot, TaskSlot, TaskSummary, GRID_CELLS,
};
pub use palette::Palette;
pub use week_span::{build_week_spans, expand_fragments, WeekSpan, WeekWindow};
pub use week_timeline::{
    layout_day, layout_day_with, layout_week, WeekLayoutCache, WeekTimelineOptions,
};
