//! Insertion strategies.
//!
//! Both strategies only touch the grid they are given. Persisting is the
//! caller's job and must happen only after a successful return; on error the
//! grid is left exactly as it was.

use serde::Deserialize;
use tracing::{debug, info};

use crate::address::CellAddress;
use crate::error::{Error, Result};
use crate::grid::{CellValue, Grid};

/// Values to write: a single flat row or a list of rows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Rows(Vec<Vec<CellValue>>),
    Flat(Vec<CellValue>),
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Rows(rows) => rows.is_empty(),
            Payload::Flat(values) => values.is_empty(),
        }
    }

    /// A flat payload becomes a single row.
    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        match self {
            Payload::Rows(rows) => rows,
            Payload::Flat(values) => vec![values],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOutcome {
    pub rows_written: usize,
    /// Values cut off because they ran past the right edge of the window.
    pub dropped_values: usize,
    /// Input rows left over after the window ran out of empty rows.
    pub dropped_rows: usize,
}

impl WriteOutcome {
    pub fn has_overflow(&self) -> bool {
        self.dropped_values > 0 || self.dropped_rows > 0
    }
}

/// First cell holding exactly `delimiter`, scanning rows top to bottom and
/// each row left to right. Returns one-based `(row, column)`.
pub fn find_delimiter<G: Grid + ?Sized>(grid: &G, delimiter: &str) -> Option<(u32, u32)> {
    let (max_row, max_column) = grid.extent();
    for row in 1..=max_row {
        for column in 1..=max_column {
            if let CellValue::Text(s) = grid.get(row, column) {
                if s == delimiter {
                    return Some((row, column));
                }
            }
        }
    }
    None
}

/// Replace the first `delimiter` cell with `values` laid out to its right,
/// then move the delimiter one row down in the same column.
pub fn write_at_delimiter<G: Grid + ?Sized>(
    grid: &mut G,
    delimiter: &str,
    values: &[CellValue],
) -> Result<WriteOutcome> {
    if values.is_empty() {
        return Err(Error::InvalidParams("data must not be empty".into()));
    }
    let (row, column) =
        find_delimiter(grid, delimiter).ok_or_else(|| Error::DelimiterNotFound(delimiter.into()))?;
    debug!(row, column, delimiter, "delimiter located");

    grid.clear(row, column);
    for (offset, value) in values.iter().enumerate() {
        grid.set(row, column + offset as u32, value.clone());
    }
    grid.set(row + 1, column, CellValue::from(delimiter));

    info!(row, values = values.len(), "row written at delimiter");
    Ok(WriteOutcome {
        rows_written: 1,
        ..WriteOutcome::default()
    })
}

fn row_is_empty<G: Grid + ?Sized>(grid: &G, row: u32, first: u32, last: u32) -> bool {
    (first..=last).all(|column| grid.get(row, column).is_empty())
}

/// Write `rows` into the fully empty rows of the `start..=end` window, in
/// order. Rows with any populated cell inside the window are skipped whole.
///
/// Values wider than the window and rows beyond its last empty row are
/// dropped; the counts are reported in the returned [`WriteOutcome`].
pub fn write_in_range<G: Grid + ?Sized>(
    grid: &mut G,
    start: CellAddress,
    end: CellAddress,
    rows: &[Vec<CellValue>],
) -> Result<WriteOutcome> {
    if rows.is_empty() {
        return Err(Error::InvalidParams("data must not be empty".into()));
    }
    if end.row < start.row || end.column < start.column {
        return Err(Error::InvalidParams(format!(
            "end cell {end} lies before start cell {start}"
        )));
    }

    let width = (end.column - start.column + 1) as usize;
    let mut outcome = WriteOutcome::default();
    let mut pending = rows.iter();
    let mut next = pending.next();

    for row in start.row..=end.row {
        let Some(values) = next else { break };
        if !row_is_empty(grid, row, start.column, end.column) {
            debug!(row, "row occupied, skipped");
            continue;
        }
        for (offset, value) in values.iter().take(width).enumerate() {
            grid.set(row, start.column + offset as u32, value.clone());
        }
        outcome.dropped_values += values.len().saturating_sub(width);
        outcome.rows_written += 1;
        next = pending.next();
    }

    if outcome.rows_written == 0 {
        return Err(Error::NoEmptyRowAvailable {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    outcome.dropped_rows = rows.len() - outcome.rows_written;
    info!(
        rows_written = outcome.rows_written,
        dropped_values = outcome.dropped_values,
        dropped_rows = outcome.dropped_rows,
        "rows written in range"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SheetGrid;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    fn row(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    #[test]
    fn delimiter_write_fills_row_and_moves_sentinel_down() {
        let mut grid = SheetGrid::from_rows([vec!["h1", "h2", "h3"], vec!["", "*/", ""]]);
        let outcome =
            write_at_delimiter(&mut grid, "*/", &[CellValue::from("v1"), 2.0.into(), true.into()])
                .unwrap();

        assert_eq!(outcome.rows_written, 1);
        assert_eq!(grid.get(2, 2), CellValue::from("v1"));
        assert_eq!(grid.get(2, 3), CellValue::Number(2.0));
        assert_eq!(grid.get(2, 4), CellValue::Bool(true));
        assert_eq!(grid.get(3, 2), CellValue::from("*/"));
        assert_eq!(find_delimiter(&grid, "*/"), Some((3, 2)));
    }

    #[test]
    fn repeated_delimiter_writes_append_rows() {
        let mut grid = SheetGrid::from_rows([["*/"]]);
        write_at_delimiter(&mut grid, "*/", &row(&["a", "b"])).unwrap();
        write_at_delimiter(&mut grid, "*/", &row(&["c", "d"])).unwrap();
        let rows = crate::reader::read_range(
            &grid,
            addr("A1"),
            &crate::reader::StopCondition::End(addr("B3")),
        )
        .unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"], vec!["*/", ""]]);
    }

    #[test]
    fn only_first_delimiter_in_row_major_order_is_used() {
        let mut grid = SheetGrid::from_rows([vec!["", "", "*/"], vec!["*/", "", ""]]);
        assert_eq!(find_delimiter(&grid, "*/"), Some((1, 3)));
        write_at_delimiter(&mut grid, "*/", &row(&["x"])).unwrap();
        assert_eq!(grid.get(1, 3), CellValue::from("x"));
        assert_eq!(grid.get(2, 3), CellValue::from("*/"));
        assert_eq!(grid.get(2, 1), CellValue::from("*/"));
    }

    #[test]
    fn delimiter_write_may_extend_past_last_column() {
        let mut grid = SheetGrid::from_rows([["*/"]]);
        let values: Vec<CellValue> = (0..30).map(|n| CellValue::Number(n as f64)).collect();
        write_at_delimiter(&mut grid, "*/", &values).unwrap();
        assert_eq!(grid.get(1, 30), CellValue::Number(29.0));
        assert_eq!(grid.extent(), (2, 30));
    }

    #[test]
    fn missing_delimiter_leaves_grid_untouched() {
        let mut grid = SheetGrid::from_rows([["a", "*/ "]]);
        let before = grid.clone();
        let err = write_at_delimiter(&mut grid, "*/", &row(&["x"])).unwrap_err();
        assert!(matches!(err, Error::DelimiterNotFound(d) if d == "*/"));
        assert_eq!(grid, before);
    }

    #[test]
    fn range_write_uses_first_empty_rows() {
        let mut grid = SheetGrid::from_rows([["a", "b"], ["c", "d"]]);
        let outcome = write_in_range(
            &mut grid,
            addr("A1"),
            addr("B5"),
            &[row(&["x", "y"]), row(&["z", "w"])],
        )
        .unwrap();

        assert_eq!(
            outcome,
            WriteOutcome {
                rows_written: 2,
                dropped_values: 0,
                dropped_rows: 0
            }
        );
        assert_eq!(grid.get(3, 1), CellValue::from("x"));
        assert_eq!(grid.get(3, 2), CellValue::from("y"));
        assert_eq!(grid.get(4, 1), CellValue::from("z"));
        assert_eq!(grid.get(4, 2), CellValue::from("w"));
        assert!(grid.get(5, 1).is_empty() && grid.get(5, 2).is_empty());
        assert_eq!(grid.get(1, 1), CellValue::from("a"));
    }

    #[test]
    fn partially_filled_rows_are_skipped_whole() {
        let mut grid = SheetGrid::new();
        grid.set(1, 2, "taken".into());
        grid.set(2, 1, "".into());
        write_in_range(&mut grid, addr("A1"), addr("C3"), &[row(&["x", "y", "z"])]).unwrap();
        assert_eq!(grid.get(1, 1), CellValue::Empty);
        assert_eq!(grid.get(1, 2), CellValue::from("taken"));
        assert_eq!(grid.get(2, 1), CellValue::from("x"));
        assert_eq!(grid.get(2, 3), CellValue::from("z"));
    }

    #[test]
    fn cells_outside_window_do_not_block_a_row() {
        let mut grid = SheetGrid::new();
        grid.set(1, 4, "beside".into());
        write_in_range(&mut grid, addr("A1"), addr("C1"), &[row(&["x"])]).unwrap();
        assert_eq!(grid.get(1, 1), CellValue::from("x"));
    }

    #[test]
    fn overflow_is_clipped_and_counted() {
        let mut grid = SheetGrid::new();
        let outcome = write_in_range(
            &mut grid,
            addr("B1"),
            addr("C2"),
            &[row(&["1", "2", "3", "4"]), row(&["5"]), row(&["6"])],
        )
        .unwrap();
        assert_eq!(outcome.rows_written, 2);
        assert_eq!(outcome.dropped_values, 2);
        assert_eq!(outcome.dropped_rows, 1);
        assert!(outcome.has_overflow());
        assert_eq!(grid.get(1, 3), CellValue::from("2"));
        assert_eq!(grid.get(1, 4), CellValue::Empty);
        assert_eq!(grid.get(2, 2), CellValue::from("5"));
        assert_eq!(grid.extent(), (2, 3));
    }

    #[test]
    fn full_window_fails_without_mutation() {
        let mut grid = SheetGrid::from_rows([["a"], ["b"]]);
        let before = grid.clone();
        let err = write_in_range(&mut grid, addr("A1"), addr("A2"), &[row(&["x"])]).unwrap_err();
        assert!(matches!(err, Error::NoEmptyRowAvailable { .. }));
        assert_eq!(grid, before);
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut grid = SheetGrid::new();
        assert!(matches!(
            write_in_range(&mut grid, addr("A1"), addr("A2"), &[]),
            Err(Error::InvalidParams(_))
        ));
        assert!(matches!(
            write_at_delimiter(&mut grid, "*/", &[]),
            Err(Error::InvalidParams(_))
        ));
    }

    #[test]
    fn flat_payload_becomes_one_row() {
        let flat: Payload = serde_json::from_str(r#"["a", 1]"#).unwrap();
        assert_eq!(flat.into_rows(), vec![vec![CellValue::from("a"), CellValue::Number(1.0)]]);
        let nested: Payload = serde_json::from_str(r#"[["a"], ["b", null]]"#).unwrap();
        assert_eq!(
            nested.into_rows(),
            vec![vec![CellValue::from("a")], vec![CellValue::from("b"), CellValue::Empty]]
        );
    }
}
