//! Bounded window reads.

use tracing::debug;

use crate::address::{CellAddress, MAX_SHEET_COLUMNS};
use crate::error::{Error, Result};
use crate::grid::Grid;

/// How far below the start row a delimiter-bounded read may look.
///
/// The window covers `start.row ..= start.row + SCAN_CEILING_ROWS`. Reaching
/// the ceiling without meeting the delimiter is not an error.
pub const SCAN_CEILING_ROWS: u32 = 1000;

/// Rows of stringified, trimmed cell values in sheet order.
pub type ReadResult = Vec<Vec<String>>;

/// Where a read stops.
#[derive(Debug, Clone, PartialEq)]
pub enum StopCondition {
    /// Inclusive bottom-right corner.
    End(CellAddress),
    /// Stop before the first row containing `delimiter` in any of
    /// `column_count` columns.
    Delimiter {
        delimiter: String,
        column_count: u32,
    },
}

impl StopCondition {
    /// Exactly one of `end` or `delimiter` must be given; the delimiter form
    /// also needs a column count.
    pub fn from_parts(
        end: Option<CellAddress>,
        delimiter: Option<String>,
        column_count: Option<u32>,
    ) -> Result<Self> {
        match (end, delimiter) {
            (Some(_), Some(_)) => Err(Error::AmbiguousRangeSpec(
                "an end cell and a delimiter cannot be combined",
            )),
            (None, None) => Err(Error::AmbiguousRangeSpec(
                "either an end cell or a delimiter is required",
            )),
            (Some(end), None) => Ok(StopCondition::End(end)),
            (None, Some(delimiter)) => match column_count {
                Some(column_count) if column_count > 0 => Ok(StopCondition::Delimiter {
                    delimiter,
                    column_count,
                }),
                Some(_) => Err(Error::InvalidParams(
                    "num_columns must be a positive integer".into(),
                )),
                None => Err(Error::InvalidParams(
                    "num_columns is required when reading up to a delimiter".into(),
                )),
            },
        }
    }
}

fn read_row<G: Grid + ?Sized>(grid: &G, row: u32, first: u32, last: u32) -> Vec<String> {
    (first..=last)
        .map(|column| grid.get(row, column).to_string().trim().to_string())
        .collect()
}

/// Read the window starting at `start`. The grid is never mutated.
pub fn read_range<G: Grid + ?Sized>(
    grid: &G,
    start: CellAddress,
    stop: &StopCondition,
) -> Result<ReadResult> {
    match stop {
        StopCondition::End(end) => {
            if end.row < start.row || end.column < start.column {
                return Err(Error::InvalidParams(format!(
                    "end cell {end} lies before start cell {start}"
                )));
            }
            debug!(%start, %end, "reading fixed window");
            Ok((start.row..=end.row)
                .map(|row| read_row(grid, row, start.column, end.column))
                .collect())
        }
        StopCondition::Delimiter {
            delimiter,
            column_count,
        } => {
            let delimiter = delimiter.trim();
            let last_column = start
                .column
                .checked_add(column_count - 1)
                .filter(|&last| last <= MAX_SHEET_COLUMNS)
                .ok_or_else(|| {
                    Error::InvalidParams(format!(
                        "num_columns {column_count} runs past the last sheet column"
                    ))
                })?;
            let last_row = start.row.saturating_add(SCAN_CEILING_ROWS);
            debug!(%start, delimiter, column_count, last_row, "reading up to delimiter");

            let mut rows = Vec::new();
            for row in start.row..=last_row {
                let values = read_row(grid, row, start.column, last_column);
                if values.iter().any(|v| v == delimiter) {
                    debug!(row, "delimiter row reached");
                    return Ok(rows);
                }
                rows.push(values);
            }
            debug!(scanned = rows.len(), "scan ceiling reached without delimiter");
            Ok(rows)
        }
    }
}
