//! Week time-grid layout.
//!
//! Structurally a per-day resolver, with rules of its own:
//!
//! - Items sharing exactly the same `(start, end)` sit side by side as equal
//!   columns. This is decided before any other overlap handling.
//! - Any other overlap falls back to a stacked offset: members keep the full
//!   column and carry `is_partial_overlap` plus an `overlap_depth` the
//!   renderer turns into a diagonal stagger.
//! - A caller-owned [`WeekLayoutCache`] holds the previous output so side by
//!   side columns keep their order across re-renders.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::day::{sort_placements, TimedPlacement, DEFAULT_TASK_BLOCK_MINUTES};
use super::interval::Extent;
use crate::item::TimedItem;

/// Options for the week time grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekTimelineOptions {
    pub task_block_minutes: u32,
    /// Two items only count as overlapping when they share at least this
    /// many minutes.
    pub min_overlap_minutes: u32,
}

impl Default for WeekTimelineOptions {
    fn default() -> Self {
        Self {
            task_block_minutes: DEFAULT_TASK_BLOCK_MINUTES,
            min_overlap_minutes: 1,
        }
    }
}

/// Previous layout keyed by `(date, item id)`.
///
/// Keying by date keeps repeat occurrences that share an id on different
/// days apart. Must be cleared whenever the visible week changes.
#[derive(Debug, Clone, Default)]
pub struct WeekLayoutCache {
    previous: HashMap<(NaiveDate, String), TimedPlacement>,
}

impl WeekLayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate, id: &str) -> Option<&TimedPlacement> {
        self.previous.get(&(date, id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }

    pub fn clear(&mut self) {
        self.previous.clear();
    }

    /// Replace the entries of `date` only; other days keep theirs.
    fn replace_day(&mut self, date: NaiveDate, placements: &[TimedPlacement]) {
        self.previous.retain(|(day, _), _| *day != date);
        self.insert_day(date, placements);
    }

    fn insert_day(&mut self, date: NaiveDate, placements: &[TimedPlacement]) {
        for placement in placements {
            self.previous
                .insert((date, placement.item.id.clone()), placement.clone());
        }
    }
}

/// Lay out one day of the week and record it in `cache`.
///
/// Entries for other dates are left alone, so a caller may lay out the
/// week one column at a time.
pub fn layout_day(
    date: NaiveDate,
    items: &[TimedItem],
    options: &WeekTimelineOptions,
    cache: &mut WeekLayoutCache,
) -> Vec<TimedPlacement> {
    let placements = layout_day_with(date, items, options, cache);
    cache.replace_day(date, &placements);
    placements
}

/// Lay out every day of a week and replace `cache` with the combined result.
pub fn layout_week(
    days: &BTreeMap<NaiveDate, Vec<TimedItem>>,
    options: &WeekTimelineOptions,
    cache: &mut WeekLayoutCache,
) -> BTreeMap<NaiveDate, Vec<TimedPlacement>> {
    let week: BTreeMap<NaiveDate, Vec<TimedPlacement>> = days
        .iter()
        .map(|(date, items)| (*date, layout_day_with(*date, items, options, cache)))
        .collect();
    cache.clear();
    for (date, placements) in &week {
        cache.insert_day(*date, placements);
    }
    week
}

/// Pure form of [`layout_day`]: reads `previous` but leaves it untouched.
pub fn layout_day_with(
    date: NaiveDate,
    items: &[TimedItem],
    options: &WeekTimelineOptions,
    previous: &WeekLayoutCache,
) -> Vec<TimedPlacement> {
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

    let buckets = duplicate_buckets(&placements);
    let clusters = overlap_clusters(&placements, &buckets, options.min_overlap_minutes);

    for cluster in &clusters {
        let stacked = cluster.len() > 1;
        for (depth, &bucket_idx) in cluster.iter().enumerate() {
            let members =
                ordered_members(&placements, &buckets[bucket_idx], |id| previous.get(date, id));
            let width = members.len();
            for (column, idx) in members.into_iter().enumerate() {
                let placement = &mut placements[idx];
                placement.column = column;
                placement.total_columns = width;
                placement.is_partial_overlap = stacked;
                placement.overlap_depth = if stacked { depth } else { 0 };
            }
        }
    }

    tracing::debug!(
        %date,
        items = placements.len(),
        clusters = clusters.len(),
        "laid out week day"
    );
    placements
}

/// Runs of identical `(start, visual end)` in sorted placements.
fn duplicate_buckets(sorted: &[TimedPlacement]) -> Vec<Vec<usize>> {
    let mut buckets: Vec<Vec<usize>> = Vec::new();
    for (idx, placement) in sorted.iter().enumerate() {
        let same_range = buckets.last().and_then(|bucket| bucket.first()).is_some_and(|&first| {
            sorted[first].item.start_minute == placement.item.start_minute
                && sorted[first].visual_end_minute == placement.visual_end_minute
        });
        match buckets.last_mut() {
            Some(bucket) if same_range => bucket.push(idx),
            _ => buckets.push(vec![idx]),
        }
    }
    buckets
}

/// Connected components of buckets under the tolerance-aware overlap test.
///
/// Each cluster lists bucket indices in ascending order, which is also
/// ascending `(start, end)` order.
fn overlap_clusters(
    sorted: &[TimedPlacement],
    buckets: &[Vec<usize>],
    min_overlap_minutes: u32,
) -> Vec<Vec<usize>> {
    let extents: Vec<Extent> = buckets
        .iter()
        .map(|bucket| {
            let p = &sorted[bucket[0]];
            Extent::new(i64::from(p.item.start_minute), i64::from(p.visual_end_minute))
        })
        .collect();
    let needed = i64::from(min_overlap_minutes.max(1));

    let mut parent: Vec<usize> = (0..buckets.len()).collect();
    for a in 0..extents.len() {
        for b in (a + 1)..extents.len() {
            if extents[b].start >= extents[a].end {
                // Sorted by start: no later bucket can reach `a` either.
                break;
            }
            if extents[a].shared_length(&extents[b]) >= needed {
                let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
                if ra != rb {
                    parent[ra.max(rb)] = ra.min(rb);
                }
            }
        }
    }

    let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for bucket in 0..buckets.len() {
        let root = find(&mut parent, bucket);
        clusters.entry(root).or_default().push(bucket);
    }
    clusters.into_values().collect()
}

fn find(parent: &mut [usize], mut node: usize) -> usize {
    while parent[node] != node {
        parent[node] = parent[parent[node]];
        node = parent[node];
    }
    node
}

/// Members of a duplicate bucket in column order.
///
/// Keeps the cached order when the bucket had exactly this membership and
/// width last time; otherwise uses the sorted order.
fn ordered_members<'c>(
    sorted: &[TimedPlacement],
    bucket: &[usize],
    previous: impl Fn(&str) -> Option<&'c TimedPlacement>,
) -> Vec<usize> {
    let mut members = bucket.to_vec();
    if members.len() < 2 {
        return members;
    }

    let cached: Option<Vec<usize>> = members
        .iter()
        .map(|&idx| {
            previous(&sorted[idx].item.id)
                .filter(|p| p.total_columns == bucket.len())
                .map(|p| p.column)
        })
        .collect();
    if let Some(columns) = cached {
        let mut seen = columns.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() == members.len() {
            let mut keyed: Vec<(usize, usize)> = columns.into_iter().zip(members).collect();
            keyed.sort_unstable();
            members = keyed.into_iter().map(|(_, idx)| idx).collect();
        }
    }
    members
}
