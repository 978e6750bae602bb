//! The write operation: insert data at a delimiter or into the first empty
//! rows of a window, then save the workbook in place.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, warn};

use crate::address::CellAddress;
use crate::error::Error;
use crate::grid::CellValue;
use crate::module::{self, Response, non_empty};
use crate::workbook::Workbook;
use crate::writer::{Payload, WriteOutcome, write_at_delimiter, write_in_range};

#[derive(Debug, Clone, Deserialize)]
pub struct WriteParams {
    pub path: PathBuf,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub start_cell: Option<String>,
    #[serde(default)]
    pub end_cell: Option<String>,
    pub data: Payload,
    #[serde(rename = "_ansible_check_mode", default)]
    pub check_mode: bool,
}

/// A validated insertion request.
#[derive(Debug, Clone, PartialEq)]
pub enum Insertion {
    AtDelimiter {
        delimiter: String,
        values: Vec<CellValue>,
    },
    InRange {
        start: CellAddress,
        end: CellAddress,
        rows: Vec<Vec<CellValue>>,
    },
}

impl Insertion {
    pub fn from_params(params: &WriteParams) -> crate::Result<Self> {
        if params.data.is_empty() {
            return Err(Error::InvalidParams("data must not be empty".into()));
        }
        let start = non_empty(&params.start_cell);
        let end = non_empty(&params.end_cell);

        match (non_empty(&params.delimiter), start, end) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(Error::AmbiguousRangeSpec(
                "a delimiter cannot be combined with start_cell or end_cell",
            )),
            (Some(delimiter), None, None) => match &params.data {
                Payload::Flat(values) => Ok(Insertion::AtDelimiter {
                    delimiter: delimiter.to_string(),
                    values: values.clone(),
                }),
                Payload::Rows(_) => Err(Error::InvalidParams(
                    "delimiter writes take a flat list of values".into(),
                )),
            },
            (None, Some(start), Some(end)) => Ok(Insertion::InRange {
                start: CellAddress::parse(start)?,
                end: CellAddress::parse(end)?,
                rows: params.data.clone().into_rows(),
            }),
            (None, _, _) => Err(Error::AmbiguousRangeSpec(
                "start_cell and end_cell are required when no delimiter is given",
            )),
        }
    }
}

/// Apply `insertion` and save. Nothing is saved when the insertion fails.
pub fn modify(
    path: &Path,
    sheet: Option<&str>,
    insertion: &Insertion,
) -> crate::Result<WriteOutcome> {
    let mut workbook = Workbook::open(path)?;
    let outcome = {
        let mut grid = workbook.sheet_mut(sheet)?;
        match insertion {
            Insertion::AtDelimiter { delimiter, values } => {
                write_at_delimiter(&mut grid, delimiter, values)?
            }
            Insertion::InRange { start, end, rows } => {
                write_in_range(&mut grid, *start, *end, rows)?
            }
        }
    };
    if outcome.has_overflow() {
        warn!(
            dropped_values = outcome.dropped_values,
            dropped_rows = outcome.dropped_rows,
            "data did not fit the range and was partially discarded"
        );
    }
    workbook.save()?;
    Ok(outcome)
}

pub fn run(args: impl IntoIterator<Item = OsString>) -> Result<Response> {
    let params: WriteParams = module::load_params(args)?;
    let insertion = Insertion::from_params(&params)?;

    if params.check_mode {
        info!(path = %params.path.display(), "check mode, workbook left untouched");
        return Ok(Response::ok(false, "Check mode: no changes made."));
    }

    let outcome = modify(&params.path, non_empty(&params.sheet), &insertion)?;
    let mut response = Response::ok(true, "The workbook was modified successfully.");
    if let Insertion::InRange { .. } = insertion {
        response.rows_written = Some(outcome.rows_written);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(json: &str) -> WriteParams {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn delimiter_params_build_a_delimiter_insertion() {
        let p = params(r#"{"path": "b.xlsx", "delimiter": "*/", "data": ["a", 1]}"#);
        assert_eq!(
            Insertion::from_params(&p).unwrap(),
            Insertion::AtDelimiter {
                delimiter: "*/".into(),
                values: vec![CellValue::from("a"), CellValue::Number(1.0)],
            }
        );
    }

    #[test]
    fn range_params_normalize_a_flat_row() {
        let p = params(r#"{"path": "b.xlsx", "start_cell": "A34", "end_cell": "J34", "data": ["x"]}"#);
        let Insertion::InRange { start, end, rows } = Insertion::from_params(&p).unwrap() else {
            panic!("expected a range insertion");
        };
        assert_eq!(start.to_string(), "A34");
        assert_eq!(end.to_string(), "J34");
        assert_eq!(rows, vec![vec![CellValue::from("x")]]);
    }

    #[test]
    fn conflicting_or_missing_strategy_is_ambiguous() {
        for json in [
            r#"{"path": "b.xlsx", "delimiter": "*/", "start_cell": "A1", "data": ["x"]}"#,
            r#"{"path": "b.xlsx", "delimiter": "*/", "end_cell": "B2", "data": ["x"]}"#,
            r#"{"path": "b.xlsx", "start_cell": "A1", "data": ["x"]}"#,
            r#"{"path": "b.xlsx", "delimiter": "", "data": ["x"]}"#,
        ] {
            assert!(
                matches!(Insertion::from_params(&params(json)), Err(Error::AmbiguousRangeSpec(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn bad_data_shapes_are_rejected() {
        let empty = params(r#"{"path": "b.xlsx", "delimiter": "*/", "data": []}"#);
        assert!(matches!(Insertion::from_params(&empty), Err(Error::InvalidParams(_))));
        let nested = params(r#"{"path": "b.xlsx", "delimiter": "*/", "data": [["x"]]}"#);
        assert!(matches!(Insertion::from_params(&nested), Err(Error::InvalidParams(_))));
        let bad_cell = params(r#"{"path": "b.xlsx", "start_cell": "AB1", "end_cell": "B2", "data": ["x"]}"#);
        assert!(matches!(Insertion::from_params(&bad_cell), Err(Error::InvalidAddress { .. })));
    }

    #[test]
    fn check_mode_flag_is_read_from_host_key() {
        let p = params(r#"{"path": "b.xlsx", "delimiter": "*/", "data": ["x"], "_ansible_check_mode": true}"#);
        assert!(p.check_mode);
    }
}
