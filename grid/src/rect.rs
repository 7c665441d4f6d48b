//! Cell rectangles and the rectangularity check.
//!
//! A booking must cover one solid, axis-aligned block of plots. The check is
//! an area comparison: a set of `n` distinct plots whose bounding box has
//! area `n` fills that box with no gaps. Distinctness comes for free from
//! [`CellSet`], so no per-cell gap scan is needed.

#[cfg(test)]
#[path = "rect_test.rs"]
mod rect_test;

use serde::Serialize;

use crate::cell::{CellId, CellSet};
use crate::consts::{GRID_COLS, GRID_ROWS};

/// An axis-aligned block of plots, anchored at its top-left plot.
///
/// Every `CellRect` lies wholly on the grid: it can only be built from plots
/// ([`rectangle_between`], [`bounding_box`]) or through the bounds-checked
/// [`CellRect::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellRect {
    row_start: u8,
    col_start: u8,
    width: u8,
    height: u8,
}

impl CellRect {
    /// A rectangle from its top-left plot and extent. `None` when either
    /// extent is zero or the far edge falls off the grid.
    #[must_use]
    pub fn new(row_start: u8, col_start: u8, width: u8, height: u8) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let row_end = u16::from(row_start) + u16::from(height);
        let col_end = u16::from(col_start) + u16::from(width);
        if row_end > u16::from(GRID_ROWS) || col_end > u16::from(GRID_COLS) {
            return None;
        }
        Some(Self { row_start, col_start, width, height })
    }

    /// Topmost row covered.
    #[must_use]
    pub fn row_start(&self) -> u8 {
        self.row_start
    }

    /// Leftmost column covered.
    #[must_use]
    pub fn col_start(&self) -> u8 {
        self.col_start
    }

    /// Number of columns covered (at least 1).
    #[must_use]
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Number of rows covered (at least 1).
    #[must_use]
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of plots inside the rectangle.
    #[must_use]
    pub fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Width over height, used to size the image crop for a booking.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Every plot inside the rectangle, row-major.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + use<> {
        let CellRect { row_start, col_start, width, height } = *self;
        (row_start..row_start + height)
            .flat_map(move |row| (col_start..col_start + width).map(move |col| CellId::at(row, col)))
    }
}

/// The rectangle spanned by two corner plots, whichever way round they are.
#[must_use]
pub fn rectangle_between(a: CellId, b: CellId) -> CellRect {
    let (row_min, row_max) = (a.row().min(b.row()), a.row().max(b.row()));
    let (col_min, col_max) = (a.col().min(b.col()), a.col().max(b.col()));
    CellRect {
        row_start: row_min,
        col_start: col_min,
        width: col_max - col_min + 1,
        height: row_max - row_min + 1,
    }
}

/// Smallest rectangle containing every plot in `cells`; `None` when empty.
#[must_use]
pub fn bounding_box<I>(cells: I) -> Option<CellRect>
where
    I: IntoIterator<Item = CellId>,
{
    let mut cells = cells.into_iter();
    let first = cells.next()?;
    let (mut row_min, mut row_max) = (first.row(), first.row());
    let (mut col_min, mut col_max) = (first.col(), first.col());
    for cell in cells {
        row_min = row_min.min(cell.row());
        row_max = row_max.max(cell.row());
        col_min = col_min.min(cell.col());
        col_max = col_max.max(cell.col());
    }
    Some(CellRect {
        row_start: row_min,
        col_start: col_min,
        width: col_max - col_min + 1,
        height: row_max - row_min + 1,
    })
}

/// Whether `cells` exactly fills its own bounding box. Empty sets are never
/// rectangular.
#[must_use]
pub fn is_rectangular(cells: &CellSet) -> bool {
    bounding_box(cells.iter().copied()).is_some_and(|bbox| bbox.area() == cells.len())
}
