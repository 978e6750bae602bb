//! Spreadsheet range engine behind the `read_excel` and `mod_excel` binary
//! modules.
//!
//! [`CellAddress`] turns `A34`-style coordinates into grid positions,
//! [`reader`] scans a bounded window of a sheet and [`writer`] inserts rows
//! either at a sentinel cell or into the first empty rows of a window.
//! [`workbook`] moves sheets between disk and memory.

pub mod address;
pub mod error;
pub mod grid;
pub mod mod_excel;
pub mod module;
pub mod read_excel;
pub mod reader;
pub mod workbook;
pub mod writer;

pub use address::CellAddress;
pub use error::{Error, Result};
pub use grid::{CellValue, Grid, SheetGrid};
pub use reader::{ReadResult, SCAN_CEILING_ROWS, StopCondition};
pub use writer::{Payload, WriteOutcome};
