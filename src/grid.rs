//! Cell values and the 2-D grid abstraction the range engine operates on.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// A scalar cell value. Formulas, styles and merges are not modelled.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Absent cells and empty strings both count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Row/column addressed cell storage. Coordinates are one-based and the
/// column is not limited to `A`..=`Z`: writes may run past the last letter.
pub trait Grid {
    fn get(&self, row: u32, column: u32) -> CellValue;

    fn set(&mut self, row: u32, column: u32, value: CellValue);

    fn clear(&mut self, row: u32, column: u32) {
        self.set(row, column, CellValue::Empty);
    }

    /// `(highest row, highest column)` holding any cell, `(0, 0)` when empty.
    fn extent(&self) -> (u32, u32);
}

/// Owned in-memory grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    cells: BTreeMap<(u32, u32), CellValue>,
}

impl SheetGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill rows top-down starting at `A1`.
    pub fn from_rows<R, V>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let mut grid = Self::new();
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                grid.set(r as u32 + 1, c as u32 + 1, value.into());
            }
        }
        grid
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Grid for SheetGrid {
    fn get(&self, row: u32, column: u32) -> CellValue {
        self.cells.get(&(row, column)).cloned().unwrap_or_default()
    }

    fn set(&mut self, row: u32, column: u32, value: CellValue) {
        if matches!(value, CellValue::Empty) {
            self.cells.remove(&(row, column));
        } else {
            self.cells.insert((row, column), value);
        }
    }

    fn extent(&self) -> (u32, u32) {
        let max_row = self.cells.keys().map(|&(r, _)| r).max().unwrap_or(0);
        let max_column = self.cells.keys().map(|&(_, c)| c).max().unwrap_or(0);
        (max_row, max_column)
    }
}
