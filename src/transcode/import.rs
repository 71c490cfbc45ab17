//! Sheet grid → markup table

use crate::transcode::MergeIndex;
use crate::types::{CellCoordinate, MarkupCell, MarkupRow, MarkupTable, SheetGrid};
use tracing::debug;

/// Preallocation cap: one worksheet's row limit
const ROW_CAPACITY_HINT: u64 = 1_048_576;

/// Row-major scan of the used range. Covered cells emit nothing; merge origins
/// carry the region's spans. A grid without a used range yields no rows.
pub fn grid_to_markup(grid: &SheetGrid) -> MarkupTable {
    let Some(range) = grid.used_range else {
        debug!("sheet has no used range, emitting empty table");
        return MarkupTable::default();
    };

    let index = MergeIndex::build(&grid.merges, &range);
    let mut rows = Vec::with_capacity(range.row_count().min(ROW_CAPACITY_HINT) as usize);

    for row in range.start_row..=range.end_row {
        let mut cells = Vec::new();

        for column in range.start_column..=range.end_column {
            let coord = CellCoordinate::new(row, column);
            if index.is_covered(coord) {
                continue;
            }

            let text = grid
                .cell_value(coord)
                .map(|value| value.display_text())
                .unwrap_or_default();

            let cell = match index.spans_at(coord) {
                Some((row_span, col_span)) => MarkupCell::spanning(text, row_span, col_span),
                None => MarkupCell::new(text),
            };
            cells.push(cell);
        }

        rows.push(MarkupRow::new(cells));
    }

    let table = MarkupTable::new(rows);
    debug!(
        used_range = %range,
        merges = grid.merges.len(),
        ignored_merges = index.ignored(),
        cells = table.cell_count(),
        "sheet transcoded to markup"
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, MergeRegion, Range};

    fn two_by_two() -> SheetGrid {
        SheetGrid::from_rows(vec![vec!["A", "B"], vec!["C", "D"]])
    }

    #[test]
    fn test_unmerged_grid_keeps_shape() {
        let table = grid_to_markup(&two_by_two());
        assert_eq!(table, MarkupTable::from_text_rows(vec![vec!["A", "B"], vec!["C", "D"]]));
    }

    #[test]
    fn test_vertical_merge_skips_covered_cell() {
        let grid = two_by_two().with_merge(MergeRegion::new(0, 1, 0, 0).unwrap());
        let table = grid_to_markup(&grid);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells, vec![MarkupCell::spanning("A", 2, 1), MarkupCell::new("B")]);
        assert_eq!(table.rows[1].cells, vec![MarkupCell::new("D")]);
    }

    #[test]
    fn test_horizontal_merge_skips_cells_in_origin_row() {
        let grid = SheetGrid::from_rows(vec![vec!["Title", "x", "y"], vec!["1", "2", "3"]])
            .with_merge(MergeRegion::new(0, 0, 0, 2).unwrap());
        let table = grid_to_markup(&grid);

        assert_eq!(table.rows[0].cells, vec![MarkupCell::spanning("Title", 1, 3)]);
        assert_eq!(table.rows[1].cells.len(), 3);
    }

    #[test]
    fn test_single_cell_merge_is_plain_cell() {
        let grid = two_by_two().with_merge(MergeRegion::new(1, 1, 1, 1).unwrap());
        let table = grid_to_markup(&grid);
        assert_eq!(table, grid_to_markup(&two_by_two()));
    }

    #[test]
    fn test_absent_values_render_empty() {
        let mut grid = SheetGrid::new(Some(Range::new(0, 1, 0, 1).unwrap()));
        grid.set_cell(CellCoordinate::new(1, 1), CellValue::Number(42.0));
        let table = grid_to_markup(&grid);
        assert_eq!(table, MarkupTable::from_text_rows(vec![vec!["", ""], vec!["", "42"]]));
    }

    #[test]
    fn test_used_range_offset_from_origin() {
        let mut grid = SheetGrid::new(Some(Range::new(2, 3, 1, 2).unwrap()));
        grid.set_cell(CellCoordinate::new(2, 1), "top".into());
        grid.set_cell(CellCoordinate::new(3, 2), CellValue::Boolean(false));
        grid.add_merge(MergeRegion::new(2, 2, 1, 2).unwrap());

        let table = grid_to_markup(&grid);
        assert_eq!(table.rows[0].cells, vec![MarkupCell::spanning("top", 1, 2)]);
        assert_eq!(table.rows[1].cells, vec![MarkupCell::new(""), MarkupCell::new("false")]);
    }

    #[test]
    fn test_merge_outside_used_range_renders_unmerged() {
        let grid = two_by_two().with_merge(MergeRegion::new(1, 5, 0, 0).unwrap());
        let table = grid_to_markup(&grid);
        assert_eq!(table, grid_to_markup(&two_by_two()));
    }

    #[test]
    fn test_no_used_range_ignores_merges() {
        let grid = SheetGrid::new(None).with_merge(MergeRegion::new(0, 3, 0, 3).unwrap());
        assert!(grid_to_markup(&grid).is_empty());
    }

    #[test]
    fn test_used_range_at_last_row_index() {
        let mut grid = SheetGrid::new(Some(Range::new(u32::MAX, u32::MAX, 0, 1).unwrap()));
        grid.set_cell(CellCoordinate::new(u32::MAX, 0), "edge".into());

        let table = grid_to_markup(&grid);
        assert_eq!(table, MarkupTable::from_text_rows(vec![vec!["edge", ""]]));
    }
}
