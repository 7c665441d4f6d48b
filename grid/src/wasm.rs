//! Browser binding.
//!
//! `BillboardHandle` wraps [`BoardCore`] for the JavaScript shell. Everything
//! crossing the boundary is a plot id string, a bool, or a JSON string, so the
//! shell never needs generated TypeScript types. Bad input from the shell
//! comes back as an `Err(String)`, which surfaces as a thrown JS error.

#[cfg(test)]
#[path = "wasm_test.rs"]
mod wasm_test;

use serde::Serialize;
use uuid::Uuid;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::ad::Ad;
use crate::board::{BoardCore, CellView};
use crate::cell::{CellId, CellIdError};
use crate::consts::{GRID_COLS, GRID_ROWS};
use crate::selection::PointerOutcome;
use crate::theme::{Layer, Theme, ThemeSpec, UnknownTheme};

/// Render instruction for one plot, as JSON.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum CellJson<'a> {
    Empty { selected: bool },
    Anchor { ad: &'a Ad, width: u8, height: u8 },
    Covered,
}

#[derive(Serialize)]
struct ThemeJson {
    theme: Theme,
    animations_enabled: bool,
    #[serde(flatten)]
    spec: &'static ThemeSpec,
    active_layers: &'static [Layer],
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn parse_cell(id: &str) -> Result<CellId, String> {
    id.parse().map_err(|e: CellIdError| e.to_string())
}

fn parse_ad_id(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|e| e.to_string())
}

/// The billboard session exposed to JavaScript.
#[wasm_bindgen]
pub struct BillboardHandle {
    core: BoardCore,
}

impl Default for BillboardHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl BillboardHandle {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self { core: BoardCore::new() }
    }

    #[must_use]
    pub fn rows() -> u8 {
        GRID_ROWS
    }

    #[must_use]
    pub fn cols() -> u8 {
        GRID_COLS
    }

    // --- Data inputs ---

    /// Replace the ad list with a JSON array of ads.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `ads_json` is not a valid ad array.
    pub fn load_snapshot(&mut self, ads_json: &str) -> Result<(), String> {
        let ads: Vec<Ad> = serde_json::from_str(ads_json).map_err(|e| e.to_string())?;
        self.core.load_snapshot(ads);
        Ok(())
    }

    /// Apply one created ad from the live feed.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `ad_json` is not a valid ad.
    pub fn apply_create(&mut self, ad_json: &str) -> Result<(), String> {
        let ad: Ad = serde_json::from_str(ad_json).map_err(|e| e.to_string())?;
        self.core.apply_create(ad);
        Ok(())
    }

    /// Apply one deleted ad. Returns whether the ad was known.
    ///
    /// # Errors
    ///
    /// Returns an error if `ad_id` is not a UUID.
    pub fn apply_delete(&mut self, ad_id: &str) -> Result<bool, String> {
        Ok(self.core.apply_delete(parse_ad_id(ad_id)?).is_some())
    }

    /// Record a successful purchase: the ad appears and the selection resets.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `ad_json` is not a valid ad.
    pub fn complete_booking(&mut self, ad_json: &str) -> Result<(), String> {
        let ad: Ad = serde_json::from_str(ad_json).map_err(|e| e.to_string())?;
        self.core.complete_booking(ad);
        Ok(())
    }

    // --- Pointer events ---

    /// Returns whether the selection changed or a drag started.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed or out-of-range plot id.
    pub fn pointer_down(&mut self, cell: &str) -> Result<bool, String> {
        let outcome = self.core.pointer_down(parse_cell(cell)?);
        Ok(outcome != PointerOutcome::Ignored)
    }

    /// Returns whether the selection may have changed.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed or out-of-range plot id.
    pub fn pointer_enter(&mut self, cell: &str) -> Result<bool, String> {
        let outcome = self.core.pointer_enter(parse_cell(cell)?);
        Ok(matches!(outcome, PointerOutcome::Selected(_)))
    }

    /// Returns whether a gesture ended.
    pub fn pointer_up(&mut self) -> bool {
        self.core.pointer_up() != PointerOutcome::Ignored
    }

    pub fn clear_selection(&mut self) {
        self.core.clear_selection();
    }

    // --- Theme ---

    /// Advance the theme and return its name.
    pub fn cycle_theme(&mut self) -> String {
        self.core.cycle_theme().to_string()
    }

    /// Switch to a named theme (`"day"`, `"night"`, `"rain"`, `"snowy"`).
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown theme name.
    pub fn set_theme(&mut self, name: &str) -> Result<(), String> {
        let theme: Theme = name.parse().map_err(|e: UnknownTheme| e.to_string())?;
        self.core.set_theme(theme);
        Ok(())
    }

    pub fn toggle_animations(&mut self) -> bool {
        self.core.toggle_animations()
    }

    /// Current theme, its decorations, and the animation setting, as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization fails.
    pub fn theme_json(&self) -> Result<String, String> {
        let theme = self.core.theme();
        let animations_enabled = self.core.animations_enabled();
        to_json(&ThemeJson {
            theme,
            animations_enabled,
            spec: theme.spec(),
            active_layers: theme.active_layers(animations_enabled),
        })
    }

    // --- Queries ---

    /// Selected plot ids, row-major.
    #[must_use]
    pub fn selection(&self) -> Vec<String> {
        self.core.selection().iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn is_selection_rectangular(&self) -> bool {
        self.core.is_selection_rectangular()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.core.controller().is_dragging()
    }

    /// The purchase payload for the current selection, as JSON.
    ///
    /// # Errors
    ///
    /// Returns the booking error message when the selection is empty or not
    /// a solid rectangle.
    pub fn booking_json(&self) -> Result<String, String> {
        let booking = self.core.booking().map_err(|e| e.to_string())?;
        to_json(&booking)
    }

    /// How to draw one plot, as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed or out-of-range plot id.
    pub fn cell_json(&self, cell: &str) -> Result<String, String> {
        let view = self.core.cell_view(parse_cell(cell)?);
        let json = match view {
            CellView::Empty { selected } => CellJson::Empty { selected },
            CellView::Covered { .. } => CellJson::Covered,
            CellView::AdAnchor(placement) => match self.core.ad(placement.ad_id) {
                Some(ad) => CellJson::Anchor { ad, width: placement.bbox.width(), height: placement.bbox.height() },
                None => CellJson::Covered,
            },
        };
        to_json(&json)
    }

    /// Ads from the last update that could not be drawn cleanly, as
    /// `{"skipped": [..], "shadowed": [..]}`. The shell logs non-empty lists.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization fails.
    pub fn integrity_json(&self) -> Result<String, String> {
        to_json(&self.core.integrity())
    }

    /// Draw plan: every visible ad with its bounding box, as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization fails.
    pub fn placements_json(&self) -> Result<String, String> {
        let placements: Vec<_> = self.core.occupancy().placements().collect();
        to_json(&placements)
    }
}
