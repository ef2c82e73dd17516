use crate::error::{AddressError, GridError};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of rows in every sheet.
pub const ROWS: usize = 10;
/// Number of columns in every sheet.
pub const COLS: usize = 10;

lazy_static! {
    static ref CELL_NAME_REGEX: Regex = Regex::new(r"^([A-Za-z])([0-9]{1,3})$").unwrap();
}

/// One grid coordinate, 0-based.
///
/// Only addresses inside the `ROWS` x `COLS` grid can be constructed, so
/// anything holding a `CellAddress` may index the grid without further checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    row: usize,
    col: usize,
}

impl CellAddress {
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < ROWS && col < COLS {
            Some(CellAddress { row, col })
        } else {
            None
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// 1-based row number shown in the row header.
    pub fn row_number(&self) -> usize {
        self.row + 1
    }

    /// Accessible label of the input at this address, e.g. `Cell C4`.
    pub fn aria_label(&self) -> String {
        format!("Cell {}", self)
    }

    /// Every address in document order: row by row, left to right.
    pub fn all() -> impl Iterator<Item = CellAddress> {
        (0..ROWS).flat_map(|row| (0..COLS).map(move |col| CellAddress { row, col }))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.col), self.row_number())
    }
}

impl FromStr for CellAddress {
    type Err = AddressError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let caps = CELL_NAME_REGEX
            .captures(name.trim())
            .ok_or_else(|| AddressError::Malformed(name.to_string()))?;

        let letter = caps[1].chars().next().unwrap_or('A').to_ascii_uppercase();
        let col = (letter as u8 - b'A') as usize;
        let row_number: usize = caps[2]
            .parse()
            .map_err(|_| AddressError::Malformed(name.to_string()))?;

        if row_number == 0 {
            return Err(AddressError::OutOfRange(name.to_string()));
        }
        CellAddress::new(row_number - 1, col).ok_or_else(|| AddressError::OutOfRange(name.to_string()))
    }
}

/// Column header letter: 0 -> 'A', 9 -> 'J'.
pub fn column_letter(col: usize) -> char {
    (b'A' + (col % 26) as u8) as char
}

/// The whole sheet: `ROWS` rows of `COLS` plain strings.
///
/// The fixed array shape keeps the row/column counts invariant; a decoded
/// sheet replaces the grid wholesale and edits overwrite single cells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: [[String; COLS]; ROWS],
}

impl Grid {
    /// A grid with every cell set to the empty string.
    pub fn create_empty() -> Self {
        Grid::default()
    }

    pub(crate) fn from_rows(cells: [[String; COLS]; ROWS]) -> Self {
        Grid { cells }
    }

    pub fn get(&self, address: CellAddress) -> &str {
        &self.cells[address.row][address.col]
    }

    /// Overwrite one cell in place.
    pub fn set(&mut self, address: CellAddress, value: impl Into<String>) {
        self.cells[address.row][address.col] = value.into();
    }

    /// Overwrite one cell by raw coordinates.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> Result<(), GridError> {
        let address = CellAddress::new(row, col).ok_or(GridError::OutOfRange {
            row,
            col,
            rows: ROWS,
            cols: COLS,
        })?;
        self.set(address, value);
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String; COLS]> {
        self.cells.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(String::is_empty)
    }
}
