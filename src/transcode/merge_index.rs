//! Precomputed merge lookup for one transcode pass
//!
//! Replaces a per-coordinate linear scan of the merge list with two maps built
//! once. Results match a first-match scan even when regions overlap: a
//! coordinate is skipped when any region covers it, and the span at an origin
//! comes from the first region in list order starting there.

use crate::types::{CellCoordinate, MergeRegion, Range};
use std::collections::{HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Default)]
pub struct MergeIndex {
    /// origin → (rowSpan, colSpan), first region wins
    origins: HashMap<CellCoordinate, (u32, u32)>,
    covered: HashSet<CellCoordinate>,
    ignored: usize,
}

impl MergeIndex {
    /// Index every merge fully inside `bounds`. Anything else is malformed and
    /// ignored, so its cells render unmerged.
    pub fn build(merges: &[MergeRegion], bounds: &Range) -> Self {
        let mut index = MergeIndex::default();

        for merge in merges {
            let range = merge.range();
            if !range.is_well_formed() || !bounds.contains_range(range) {
                warn!(merge = %range, used_range = %bounds, "ignoring merge region outside used range");
                index.ignored += 1;
                continue;
            }

            index.origins.entry(merge.origin()).or_insert_with(|| merge.spans());

            for row in range.start_row..=range.end_row {
                for column in range.start_column..=range.end_column {
                    let coord = CellCoordinate::new(row, column);
                    if coord != merge.origin() {
                        index.covered.insert(coord);
                    }
                }
            }
        }

        index
    }

    /// True for a non-origin coordinate of some merge
    pub fn is_covered(&self, coord: CellCoordinate) -> bool {
        self.covered.contains(&coord)
    }

    /// (rowSpan, colSpan) if `coord` is a merge origin
    pub fn spans_at(&self, coord: CellCoordinate) -> Option<(u32, u32)> {
        self.origins.get(&coord).copied()
    }

    /// Number of merges dropped as malformed
    pub fn ignored(&self) -> usize {
        self.ignored
    }
}
