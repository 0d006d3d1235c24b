// src/transcript/index.rs
// Segment Index - active-segment lookup over one transcript

use super::Segment;
use std::cmp::Ordering;

/// Immutable lookup structure answering "which segment is active at time t".
///
/// Built once per transcript. Lookup is a binary search over the sorted
/// segment starts, so it stays sub-linear for long videos. Canonical input
/// is non-overlapping, but overlapping segments are tolerated: on overlap
/// the lowest-indexed match wins. A running maximum of segment ends bounds
/// the backward scan, so overlap tolerance does not degrade the common
/// non-overlapping case.
pub struct SegmentIndex {
    segments: Vec<Segment>,
    /// max_end_prefix[i] = max end over segments[0..=i].
    max_end_prefix: Vec<f64>,
}

impl SegmentIndex {
    /// Builds the index. Segments are expected in non-decreasing start
    /// order; out-of-order input is sorted (stably) so the search invariant
    /// holds regardless.
    pub fn new(mut segments: Vec<Segment>) -> Self {
        segments.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));

        let mut max_end_prefix = Vec::with_capacity(segments.len());
        let mut running_max = f64::NEG_INFINITY;
        for segment in &segments {
            running_max = running_max.max(segment.end);
            max_end_prefix.push(running_max);
        }

        Self {
            segments,
            max_end_prefix,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the lowest-indexed segment with `start <= t <= end`, or
    /// `None` when no segment covers `t`. Never falls back to a previously
    /// active segment.
    pub fn active_segment(&self, t: f64) -> Option<usize> {
        if !t.is_finite() || t < 0.0 {
            return None;
        }

        // Segments at or beyond `upper` start after t and cannot match.
        let upper = self.segments.partition_point(|s| s.start <= t);

        let mut found = None;
        for i in (0..upper).rev() {
            if self.max_end_prefix[i] < t {
                // No segment at or before i reaches t.
                break;
            }
            if self.segments[i].end >= t {
                found = Some(i);
            }
        }
        found
    }
}
