//! Markup table → value grid

use crate::error::{SheetmarkError, SheetmarkResult};
use crate::types::{MarkupTable, ValueGrid};
use tracing::debug;

/// Flatten rows in document order. Spans are not expanded back into filler
/// cells, so merged layouts do not survive a round trip.
pub fn markup_to_grid(table: &MarkupTable) -> SheetmarkResult<ValueGrid> {
    if table.is_empty() {
        return Err(SheetmarkError::NoTableToExport);
    }

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|cell| cell.text.clone()).collect())
        .collect();

    debug!(rows = rows.len(), "markup flattened to grid");
    Ok(ValueGrid::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MarkupCell, MarkupRow};

    #[test]
    fn test_empty_table_is_nothing_to_export() {
        let result = markup_to_grid(&MarkupTable::default());
        assert!(matches!(result, Err(SheetmarkError::NoTableToExport)));
    }

    #[test]
    fn test_spans_are_not_expanded() {
        let table = MarkupTable::new(vec![
            MarkupRow::new(vec![MarkupCell::spanning("A", 2, 2), MarkupCell::new("B")]),
            MarkupRow::new(vec![MarkupCell::new("C")]),
        ]);
        let grid = markup_to_grid(&table).unwrap();
        assert_eq!(grid.rows, vec![vec!["A".to_string(), "B".to_string()], vec!["C".to_string()]]);
    }

    #[test]
    fn test_row_with_no_cells_stays_empty() {
        let table = MarkupTable::new(vec![MarkupRow::default(), MarkupRow::new(vec![MarkupCell::new("x")])]);
        let grid = markup_to_grid(&table).unwrap();
        assert_eq!(grid.row_count(), 2);
        assert!(grid.rows[0].is_empty());
    }
}
