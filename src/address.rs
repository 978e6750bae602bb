//! `<ColumnLetter><RowNumber>` cell coordinates.
//!
//! Only single-letter columns (`A`..=`Z`) are supported. Anything wider is
//! rejected with [`Error::InvalidAddress`] rather than guessed at.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Highest addressable column (`Z`).
pub const MAX_COLUMN: u32 = 26;

/// Widest sheet a read window may span (`XFD`).
pub const MAX_SHEET_COLUMNS: u32 = 16_384;

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z])([0-9]+)$").expect("valid regex"));

/// A one-based cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// 1 = `A`, 26 = `Z`
    pub column: u32,
    /// 1-based row number
    pub row: u32,
}

impl CellAddress {
    /// Parse `A1`-style notation. The column letter is case-insensitive.
    ///
    /// ```
    /// use sheetops::CellAddress;
    ///
    /// let addr = CellAddress::parse("c12").unwrap();
    /// assert_eq!((addr.column, addr.row), (3, 12));
    /// assert!(CellAddress::parse("AA1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let Some(caps) = ADDRESS_RE.captures(s) else {
            return Err(Self::diagnose(s));
        };

        let letter = caps[1].as_bytes()[0].to_ascii_uppercase();
        let column = u32::from(letter - b'A') + 1;
        let row: u32 = caps[2]
            .parse()
            .map_err(|_| Error::invalid_address(s, "row number out of range"))?;
        if row == 0 {
            return Err(Error::invalid_address(s, "row must be a positive integer"));
        }

        Ok(Self { column, row })
    }

    // Picks the most specific reason for an address the pattern rejected.
    fn diagnose(s: &str) -> Error {
        let letters = s.bytes().take_while(|b| b.is_ascii_alphabetic()).count();
        let reason = match letters {
            _ if s.is_empty() => "empty address",
            0 => "missing column letter",
            1 if s.len() == 1 => "missing row number",
            1 => "row must be a positive integer",
            _ => "multi-letter columns are not supported (A-Z only)",
        };
        Error::invalid_address(s, reason)
    }

    /// Build an address from one-based coordinates.
    pub fn new(row: u32, column: u32) -> Result<Self> {
        if row == 0 || column == 0 || column > MAX_COLUMN {
            return Err(Error::InvalidAddress {
                address: format!("R{row}C{column}"),
                reason: "coordinates outside A1..Z<n>",
            });
        }
        Ok(Self { column, row })
    }

    /// Build an address from zero-based `(row, column)` grid indices.
    pub fn from_indices(row: usize, column: usize) -> Result<Self> {
        let out_of_range = |reason| Error::InvalidAddress {
            address: format!("R{row}C{column}"),
            reason,
        };
        let one_based_row = row
            .checked_add(1)
            .and_then(|r| u32::try_from(r).ok())
            .ok_or_else(|| out_of_range("row number out of range"))?;
        let one_based_column = column
            .checked_add(1)
            .and_then(|c| u32::try_from(c).ok())
            .ok_or_else(|| out_of_range("coordinates outside A1..Z<n>"))?;
        Self::new(one_based_row, one_based_column)
    }

    /// Zero-based `(row, column)` grid indices.
    pub fn to_indices(self) -> (usize, usize) {
        ((self.row - 1) as usize, (self.column - 1) as usize)
    }

    pub fn column_letter(self) -> char {
        (b'A' + (self.column - 1) as u8) as char
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letter(), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
