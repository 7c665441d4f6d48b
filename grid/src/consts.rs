//! Shared constants for the grid crate.

// ── Grid ────────────────────────────────────────────────────────

/// Number of plot columns on the billboard.
pub const GRID_COLS: u8 = 28;

/// Number of plot rows on the billboard.
pub const GRID_ROWS: u8 = 14;

/// Total number of plots.
pub const GRID_CELLS: usize = GRID_COLS as usize * GRID_ROWS as usize;

// ── Content limits ──────────────────────────────────────────────

/// Maximum length of an ad message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 100;

/// Default upper bound for an uploaded ad image (2 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;
