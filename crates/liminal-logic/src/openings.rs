//! Splitting perimeter walls around doorways.
//!
//! A wall with no openings is emitted whole. A wall with openings becomes
//! the complementary spans, in order along the wall, so that every span gets
//! its own panel and its own collider and no collider bridges a doorway.

use crate::constants::WALL_THICKNESS;
use crate::geometry::{Direction, Point2};
use crate::layout::{Layout, WallSegment};

/// Spans shorter than this are dropped.
const MIN_SPAN: f32 = 1e-4;

/// Split a wall of `length` around `openings` given as `(center, width)`.
///
/// Openings are clamped to the wall, sorted and merged when they overlap.
/// Returns the solid `(start, end)` spans in ascending order.
pub fn split_wall(length: f32, openings: &[(f32, f32)]) -> Vec<(f32, f32)> {
    if length <= 0.0 {
        return Vec::new();
    }

    let mut gaps: Vec<(f32, f32)> = openings
        .iter()
        .map(|&(center, width)| {
            let half = width.max(0.0) / 2.0;
            ((center - half).clamp(0.0, length), (center + half).clamp(0.0, length))
        })
        .filter(|(a, b)| b - a > MIN_SPAN)
        .collect();
    gaps.sort_by(|a, b| a.0.total_cmp(&b.0));

    // Merge overlapping gaps
    let mut merged: Vec<(f32, f32)> = Vec::with_capacity(gaps.len());
    for gap in gaps {
        match merged.last_mut() {
            Some(last) if gap.0 <= last.1 => last.1 = last.1.max(gap.1),
            _ => merged.push(gap),
        }
    }

    let mut spans = Vec::with_capacity(merged.len() + 1);
    let mut cursor = 0.0;
    for (start, end) in merged {
        if start - cursor > MIN_SPAN {
            spans.push((cursor, start));
        }
        cursor = end;
    }
    if length - cursor > MIN_SPAN {
        spans.push((cursor, length));
    }
    spans
}

/// Openings declared on one side of a layout, as `(center, width)`.
pub fn openings_on(layout: &Layout, side: Direction) -> Vec<(f32, f32)> {
    layout
        .doorways
        .iter()
        .filter(|d| d.side == side)
        .map(|d| (d.offset, d.width))
        .collect()
}

/// Perimeter wall segments of a layout, split around its doorways.
pub fn perimeter_walls(layout: &Layout) -> Vec<WallSegment> {
    let mut walls = Vec::new();
    for side in Direction::ALL {
        let (a, b) = layout.wall_line(side);
        let length = layout.wall_length(side);
        let along = |t: f32| {
            let f = t / length.max(f32::EPSILON);
            Point2::new(a.x + (b.x - a.x) * f, a.z + (b.z - a.z) * f)
        };
        for (start, end) in split_wall(length, &openings_on(layout, side)) {
            walls.push(WallSegment::new(along(start), along(end), WALL_THICKNESS));
        }
    }
    walls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(spans: &[(f32, f32)]) -> f32 {
        spans.iter().map(|(a, b)| b - a).sum()
    }

    #[test]
    fn no_openings_is_one_solid_span() {
        assert_eq!(split_wall(10.0, &[]), vec![(0.0, 10.0)]);
    }

    #[test]
    fn single_opening_partitions_wall() {
        let spans = split_wall(16.0, &[(8.0, 2.0)]);
        assert_eq!(spans, vec![(0.0, 7.0), (9.0, 16.0)]);
        assert!((total(&spans) - 14.0).abs() < 1e-6);
    }

    #[test]
    fn spans_sum_to_length_minus_openings() {
        let openings = [(14.0, 2.0), (3.0, 1.5), (8.0, 2.0)];
        let spans = split_wall(20.0, &openings);
        assert_eq!(spans.len(), 4);
        assert!((total(&spans) - (20.0 - 5.5)).abs() < 1e-5);
        // sorted along the wall
        for pair in spans.windows(2) {
            assert!(pair[0].1 <= pair[1].0);
        }
    }

    #[test]
    fn overlapping_openings_merge() {
        let spans = split_wall(10.0, &[(4.0, 2.0), (5.0, 2.0)]);
        assert_eq!(spans, vec![(0.0, 3.0), (6.0, 10.0)]);
    }

    #[test]
    fn opening_at_wall_end_leaves_no_sliver() {
        let spans = split_wall(4.0, &[(3.0, 2.0)]);
        assert_eq!(spans, vec![(0.0, 2.0)]);
    }

    #[test]
    fn perimeter_never_crosses_a_doorway() {
        let layout = Layout::new("t", 12.0, 8.0)
            .with_door(Direction::East, 4.0)
            .with_door(Direction::South, 6.0);
        let walls = perimeter_walls(&layout);
        // north + west solid, east and south split in two
        assert_eq!(walls.len(), 6);
        let east: Vec<_> = walls
            .iter()
            .filter(|w| w.from.x == 12.0 && w.to.x == 12.0)
            .collect();
        assert_eq!(east.len(), 2);
        for w in east {
            let (lo, hi) = (w.from.z.min(w.to.z), w.from.z.max(w.to.z));
            assert!(hi <= 3.0 || lo >= 5.0, "segment {lo}..{hi} crosses the door");
        }
    }
}
