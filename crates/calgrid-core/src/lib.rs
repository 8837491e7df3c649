//! # calgrid Core Library
//!
//! Layout engine for calendar views. Given items already resolved to
//! concrete dates and times, it computes deterministic, non-overlapping
//! placement for three surfaces: a day time grid, a week (time grid plus
//! multi-day header strip) and a 42-cell month grid.
//!
//! ## Architecture
//!
//! - **Items**: strict input records ([`TimedItem`], [`SpanRecord`],
//!   [`CalendarItem`])
//! - **Adapter**: normalization of loosely-typed JSON payloads into items
//! - **Layout**: the four layout components, pure over their inputs
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`resolve_day`]: column packing for one day
//! - [`layout_week`]: week time grid with its [`WeekLayoutCache`]
//! - [`build_week_spans`]: week header strip rows
//! - [`build_month`]: month cells with global span lanes

pub mod adapter;
pub mod error;
pub mod item;
pub mod layout;
pub mod storage;

pub use error::{ConfigError, CoreError, ValidationError};
pub use item::{CalendarItem, SpanRecord, TimedItem};
pub use layout::{
    build_month, build_week_spans, layout_day, layout_week, resolve_day, CalendarDateItem,
    DayOptions, HolidayCalendar, MonthRequest, Palette, ScheduleSlot, TaskSlot, TaskSummary,
    TimedPlacement, WeekLayoutCache, WeekSpan, WeekTimelineOptions, WeekWindow,
};
pub use storage::Config;
