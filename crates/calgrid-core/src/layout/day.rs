//! Day overlap resolver.
//!
//! Assigns every timed item on one day a column inside its overlap group.
//! All members of a group share `total_columns` so the renderer can split
//! the day column evenly.

use serde::{Deserialize, Serialize};

use super::interval::{first_fit_lanes, sweep_groups, Interval};
use crate::item::TimedItem;

/// Default on-screen length of a task or open-ended event.
pub const DEFAULT_TASK_BLOCK_MINUTES: u32 = 60;

/// Options for [`resolve_day`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOptions {
    pub task_block_minutes: u32,
}

impl Default for DayOptions {
    fn default() -> Self {
        Self {
            task_block_minutes: DEFAULT_TASK_BLOCK_MINUTES,
        }
    }
}

/// A timed item with its placement on a time grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedPlacement {
    #[serde(flatten)]
    pub item: TimedItem,
    /// End of the block as drawn, see [`TimedItem::visual_end`].
    pub visual_end_minute: u32,
    pub column: usize,
    pub total_columns: usize,
    pub is_partial_overlap: bool,
    pub overlap_depth: usize,
}

impl TimedPlacement {
    pub fn id(&self) -> &str {
        &self.item.id
    }
}

impl Interval for TimedPlacement {
    fn start(&self) -> i64 {
        i64::from(self.item.start_minute)
    }

    fn end(&self) -> i64 {
        i64::from(self.visual_end_minute)
    }
}

/// Lay out one day's timed items.
///
/// Output is ordered by `(start, end, title, id)`, not input order.
pub fn resolve_day(items: &[TimedItem], options: &DayOptions) -> Vec<TimedPlacement> {
    let mut placements: Vec<TimedPlacement> = items
        .iter()
        .map(|item| TimedPlacement {
            visual_end_minute: item.visual_end(options.task_block_minutes),
            item: item.clone(),
            column: 0,
            total_columns: 1,
            is_partial_overlap: false,
            overlap_depth: 0,
        })
        .collect();
    sort_placements(&mut placements);

    let groups = sweep_groups(&placements);
    for group in &groups {
        let (lanes, lane_count) = first_fit_lanes(&placements[group.clone()]);
        for (placement, lane) in placements[group.clone()].iter_mut().zip(lanes) {
            placement.column = lane;
            placement.total_columns = lane_count;
        }
    }

    tracing::debug!(
        items = placements.len(),
        groups = groups.len(),
        "resolved day layout"
    );
    placements
}

/// Sort by start, then visual end, then title and id as stable tie-breaks.
pub(crate) fn sort_placements(placements: &mut [TimedPlacement]) {
    placements.sort_by(|a, b| {
        a.item
            .start_minute
            .cmp(&b.item.start_minute)
            .then(a.visual_end_minute.cmp(&b.visual_end_minute))
            .then_with(|| a.item.title.cmp(&b.item.title))
            .then_with(|| a.item.id.cmp(&b.item.id))
    });
}
