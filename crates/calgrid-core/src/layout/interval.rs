//! Interval model shared by the layout components.
//!
//! Intervals are half-open `[start, end)`. Date ranges are inclusive in the
//! records, so they enter this model as `[day, last_day + 1)`.

use std::ops::Range;

/// Anything with a half-open extent on a single axis (minutes or days).
pub trait Interval {
    fn start(&self) -> i64;
    fn end(&self) -> i64;

    /// Strict overlap: touching intervals do not overlap.
    fn overlaps(&self, other: &impl Interval) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

/// A bare half-open extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    pub start: i64,
    pub end: i64,
}

impl Extent {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Length of the shared part of two extents, zero when disjoint.
    pub fn shared_length(&self, other: &Self) -> i64 {
        (self.end.min(other.end) - self.start.max(other.start)).max(0)
    }
}

impl Interval for Extent {
    fn start(&self) -> i64 {
        self.start
    }

    fn end(&self) -> i64 {
        self.end
    }
}

/// Split intervals sorted by start into maximal overlap groups.
///
/// A new group begins when an interval starts at or after the largest end
/// seen so far in the current group.
pub fn sweep_groups<I: Interval>(sorted: &[I]) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let Some(first) = sorted.first() else {
        return groups;
    };

    let mut group_start = 0;
    let mut max_end = first.end();
    for (idx, interval) in sorted.iter().enumerate().skip(1) {
        if interval.start() >= max_end {
            groups.push(group_start..idx);
            group_start = idx;
            max_end = interval.end();
        } else {
            max_end = max_end.max(interval.end());
        }
    }
    groups.push(group_start..sorted.len());
    groups
}

/// Greedy first-fit lane packing over intervals sorted by start.
///
/// Returns the lane of each interval and the number of lanes opened.
pub fn first_fit_lanes<I: Interval>(sorted: &[I]) -> (Vec<usize>, usize) {
    let mut lane_ends: Vec<i64> = Vec::new();
    let mut lanes = Vec::with_capacity(sorted.len());

    for interval in sorted {
        match lane_ends.iter().position(|&end| end <= interval.start()) {
            Some(lane) => {
                lane_ends[lane] = interval.end();
                lanes.push(lane);
            }
            None => {
                lanes.push(lane_ends.len());
                lane_ends.push(interval.end());
            }
        }
    }

    (lanes, lane_ends.len())
}

/// Largest number of intervals active at any single point.
pub fn max_depth<I: Interval>(intervals: &[I]) -> usize {
    let mut edges: Vec<(i64, i32)> = Vec::with_capacity(intervals.len() * 2);
    for interval in intervals {
        if interval.end() > interval.start() {
            edges.push((interval.start(), 1));
            edges.push((interval.end(), -1));
        }
    }
    // Ends sort before starts at the same instant: touching is not overlap.
    edges.sort_unstable();

    let mut depth = 0i32;
    let mut deepest = 0i32;
    for (_, delta) in edges {
        depth += delta;
        deepest = deepest.max(depth);
    }
    deepest as usize
}
