//! The read operation: a window of a named sheet as rows of strings.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

use crate::address::CellAddress;
use crate::module::{self, Response, non_empty};
use crate::reader::{ReadResult, StopCondition, read_range};
use crate::workbook::load_sheet;

#[derive(Debug, Clone, Deserialize)]
pub struct ReadParams {
    pub path: PathBuf,
    pub sheet: String,
    pub start_cell: String,
    #[serde(default)]
    pub end_cell: Option<String>,
    #[serde(default)]
    pub num_columns: Option<u32>,
    #[serde(default)]
    pub delimiter: Option<String>,
}

/// Validate the parameters, then load and read. Nothing is written.
pub fn read(params: &ReadParams) -> crate::Result<ReadResult> {
    let start = CellAddress::parse(&params.start_cell)?;
    let end = non_empty(&params.end_cell)
        .map(CellAddress::parse)
        .transpose()?;
    let stop = StopCondition::from_parts(
        end,
        non_empty(&params.delimiter).map(str::to_string),
        params.num_columns,
    )?;

    let grid = load_sheet(&params.path, &params.sheet)?;
    let rows = read_range(&grid, start, &stop)?;
    info!(
        path = %params.path.display(),
        sheet = %params.sheet,
        %start,
        rows = rows.len(),
        "range read"
    );
    Ok(rows)
}

pub fn run(args: impl IntoIterator<Item = OsString>) -> Result<Response> {
    let params: ReadParams = module::load_params(args)?;
    let rows = read(&params)?;
    let msg = format!("{} rows read from sheet '{}'", rows.len(), params.sheet);
    Ok(Response {
        rows: Some(rows),
        ..Response::ok(false, msg)
    })
}
