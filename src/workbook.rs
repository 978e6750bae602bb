//! Loading sheets from disk and writing them back.
//!
//! Reads go through `calamine`, which returns cached cell values for any
//! supported container. Writes go through `umya-spreadsheet` so styles and
//! untouched sheets survive the round trip. Saving overwrites the file in
//! place; it is not atomic.

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use tracing::{debug, info};
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::error::{Error, Result};
use crate::grid::{CellValue, Grid, SheetGrid};

/// How date-time cells are rendered when read.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::FileNotFound(path.to_path_buf()))
    }
}

fn corrupt(path: &Path, reason: impl ToString) -> Error {
    Error::CorruptWorkbook {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn render_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

fn data_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::Text(render_datetime(naive)),
            None => CellValue::Text(dt.to_string()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        #[allow(unreachable_patterns)]
        other => CellValue::Text(format!("{other:?}")),
    }
}

/// Load one named sheet into an owned [`SheetGrid`].
pub fn load_sheet(path: &Path, sheet_name: &str) -> Result<SheetGrid> {
    ensure_exists(path)?;
    let mut workbook = open_workbook_auto(path).map_err(|e| corrupt(path, e))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
        return Err(Error::SheetNotFound(sheet_name.to_string()));
    }
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| corrupt(path, e))?;

    // Range positions are relative to the first used cell.
    let (row_offset, column_offset) = range.start().unwrap_or((0, 0));
    let mut grid = SheetGrid::new();
    for (row, column, data) in range.used_cells() {
        grid.set(
            row_offset + row as u32 + 1,
            column_offset + column as u32 + 1,
            data_to_value(data),
        );
    }

    debug!(path = %path.display(), sheet = sheet_name, cells = grid.len(), "sheet loaded");
    Ok(grid)
}

/// A workbook opened for modification.
pub struct Workbook {
    path: PathBuf,
    book: Spreadsheet,
}

impl Workbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        ensure_exists(path)?;
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| corrupt(path, e))?;
        info!(path = %path.display(), "workbook opened");
        Ok(Self {
            path: path.to_path_buf(),
            book,
        })
    }

    /// The named sheet, or the active one when `name` is `None`.
    pub fn sheet_mut(&mut self, name: Option<&str>) -> Result<WorksheetGrid<'_>> {
        let sheet = match name {
            Some(name) => self
                .book
                .get_sheet_by_name_mut(name)
                .ok_or_else(|| Error::SheetNotFound(name.to_string()))?,
            None => self.book.get_active_sheet_mut(),
        };
        debug!(sheet = sheet.get_name(), "sheet selected");
        Ok(WorksheetGrid { sheet })
    }

    /// Overwrite the file this workbook was opened from.
    pub fn save(&self) -> Result<()> {
        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path).map_err(|e| Error::Save {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        info!(path = %self.path.display(), "workbook saved");
        Ok(())
    }
}

/// [`Grid`] view over a mutable worksheet. `umya` takes `(column, row)`.
pub struct WorksheetGrid<'a> {
    sheet: &'a mut Worksheet,
}

impl Grid for WorksheetGrid<'_> {
    fn get(&self, row: u32, column: u32) -> CellValue {
        let Some(cell) = self.sheet.get_cell((column, row)) else {
            return CellValue::Empty;
        };
        let value = cell.get_value();
        if value.is_empty() {
            return CellValue::Empty;
        }
        match cell.get_data_type() {
            "n" => value
                .parse()
                .map(CellValue::Number)
                .unwrap_or_else(|_| CellValue::Text(value.to_string())),
            "b" => CellValue::Bool(value.eq_ignore_ascii_case("true") || value == "1"),
            _ => CellValue::Text(value.to_string()),
        }
    }

    fn set(&mut self, row: u32, column: u32, value: CellValue) {
        let cell = self.sheet.get_cell_mut((column, row));
        match value {
            CellValue::Empty => {
                cell.set_value_string(String::new());
            }
            CellValue::Text(s) => {
                cell.set_value_string(s);
            }
            CellValue::Number(n) => {
                cell.set_value_number(n);
            }
            CellValue::Bool(b) => {
                cell.set_value_bool(b);
            }
        }
    }

    fn extent(&self) -> (u32, u32) {
        (self.sheet.get_highest_row(), self.sheet.get_highest_column())
    }
}
