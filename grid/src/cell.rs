//! Plot identifiers.
//!
//! A `CellId` names one plot of the billboard by `(row, col)`. Its canonical
//! text form is `"{row}-{col}"`, which is what the server stores and what the
//! browser shell passes in for pointer events. Construction always checks the
//! grid bounds, so every `CellId` in circulation is a real plot.

#[cfg(test)]
#[path = "cell_test.rs"]
mod cell_test;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{GRID_COLS, GRID_ROWS};

/// An ordered set of plots. Iteration is row-major, so the first element is
/// always the top-left plot of the set.
pub type CellSet = BTreeSet<CellId>;

/// Errors from parsing or constructing a plot identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellIdError {
    #[error("plot id '{0}' is missing the row-col separator")]
    MissingSeparator(String),
    #[error("plot id '{0}' has a non-numeric part")]
    InvalidNumber(String),
    #[error("plot ({row}, {col}) is outside the billboard grid")]
    OutOfBounds { row: u32, col: u32 },
}

/// One plot of the billboard grid.
///
/// Ordering is row-major: `(0, 27) < (1, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellId {
    row: u8,
    col: u8,
}

impl CellId {
    /// Create a plot id, checking it lies on the grid.
    ///
    /// # Errors
    ///
    /// Returns [`CellIdError::OutOfBounds`] when `row >= GRID_ROWS` or
    /// `col >= GRID_COLS`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(row: u32, col: u32) -> Result<Self, CellIdError> {
        if row >= u32::from(GRID_ROWS) || col >= u32::from(GRID_COLS) {
            return Err(CellIdError::OutOfBounds { row, col });
        }
        Ok(Self::at(row as u8, col as u8))
    }

    /// Build from coordinates already known to be on the grid.
    pub(crate) const fn at(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub fn row(self) -> u8 {
        self.row
    }

    #[must_use]
    pub fn col(self) -> u8 {
        self.col
    }

    /// Row-major position of this plot, in `0..GRID_CELLS`.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.row) * usize::from(GRID_COLS) + usize::from(self.col)
    }

    /// Every plot on the grid in row-major (render) order.
    pub fn all() -> impl Iterator<Item = CellId> {
        (0..GRID_ROWS).flat_map(|row| (0..GRID_COLS).map(move |col| Self::at(row, col)))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for CellId {
    type Err = CellIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((row, col)) = s.split_once('-') else {
            return Err(CellIdError::MissingSeparator(s.to_owned()));
        };
        let row = row
            .trim()
            .parse::<u32>()
            .map_err(|_| CellIdError::InvalidNumber(s.to_owned()))?;
        let col = col
            .trim()
            .parse::<u32>()
            .map_err(|_| CellIdError::InvalidNumber(s.to_owned()))?;
        Self::new(row, col)
    }
}

impl TryFrom<String> for CellId {
    type Error = CellIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellId> for String {
    fn from(cell: CellId) -> Self {
        cell.to_string()
    }
}

/// Parse a list of plot ids, failing on the first malformed entry.
///
/// # Errors
///
/// Returns the first [`CellIdError`] encountered.
pub fn parse_all<S: AsRef<str>>(ids: &[S]) -> Result<Vec<CellId>, CellIdError> {
    ids.iter().map(|id| id.as_ref().parse()).collect()
}
