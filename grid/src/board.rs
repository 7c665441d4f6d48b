//! Board session core: ads, occupancy, selection, and theme in one owner.
//!
//! DESIGN
//! ======
//! `BoardCore` is the explicit store the browser shell talks to. It holds the
//! latest ad snapshot and re-derives [`Occupancy`] from the whole list on every
//! change, then prunes any selected plots that were bought in the meantime.
//! Pointer events are routed to the [`SelectionController`] together with the
//! current occupancy, so a drag is always validated against the newest list.
//!
//! Deletes can be applied optimistically: [`BoardCore::begin_delete`] removes
//! the ad locally and hands back a [`PendingDelete`]. The host either confirms
//! it ([`PendingDelete::confirm`]) or, if the remote call fails, passes it to
//! [`BoardCore::rollback_delete`] to restore the ad at its old position.
//! Occupancy itself knows nothing about this; it only sees the list it is given.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use serde::Serialize;

use crate::ad::{Ad, AdId};
use crate::cell::{CellId, CellSet};
use crate::occupancy::{Occupancy, Placement};
use crate::rect::{CellRect, bounding_box, is_rectangular};
use crate::selection::{PointerOutcome, SelectionController};
use crate::theme::Theme;

/// How one plot should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    /// Free plot, selectable.
    Empty { selected: bool },
    /// Top-left plot of an ad; draws the whole ad across its bounding box.
    AdAnchor(Placement),
    /// Spanned by an ad drawn from another plot; draws nothing.
    Covered { ad_id: AdId },
}

/// Commit payload for the purchase flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    /// Selected plots, row-major.
    pub plots: Vec<CellId>,
    pub bbox: CellRect,
    /// Width over height of the block, for cropping the uploaded image.
    pub aspect_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("no plots selected")]
    EmptySelection,
    #[error("selection is not a solid rectangle")]
    NotRectangular,
}

/// Ads in the current snapshot that the occupancy index could not place
/// cleanly. Both lists are empty for a well-formed snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Integrity {
    /// Ads with no plots; never drawn.
    pub skipped: Vec<AdId>,
    /// Ads that lost plots to a later ad covering the same plots.
    pub shadowed: Vec<AdId>,
}

impl Integrity {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.shadowed.is_empty()
    }
}

/// An ad removed locally while its remote delete is in flight.
#[derive(Debug, Clone)]
#[must_use = "a pending delete must be confirmed or rolled back"]
pub struct PendingDelete {
    ad: Ad,
    index: usize,
}

impl PendingDelete {
    #[must_use]
    pub fn ad_id(&self) -> AdId {
        self.ad.id
    }

    /// The remote delete succeeded; release the saved copy.
    #[must_use]
    pub fn confirm(self) -> Ad {
        self.ad
    }
}

/// Client-side state for one billboard session.
pub struct BoardCore {
    ads: Vec<Ad>,
    occupancy: Occupancy,
    selection: SelectionController,
    theme: Theme,
    animations_enabled: bool,
}

impl Default for BoardCore {
    fn default() -> Self {
        Self {
            ads: Vec::new(),
            occupancy: Occupancy::new(),
            selection: SelectionController::new(),
            theme: Theme::default(),
            animations_enabled: true,
        }
    }
}

impl BoardCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the ad list with a server snapshot.
    pub fn load_snapshot(&mut self, ads: Vec<Ad>) {
        self.ads = ads;
        self.rederive();
    }

    /// Apply a created ad. An ad with the same id is replaced in place.
    pub fn apply_create(&mut self, ad: Ad) {
        match self.ads.iter_mut().find(|existing| existing.id == ad.id) {
            Some(existing) => *existing = ad,
            None => self.ads.push(ad),
        }
        self.rederive();
    }

    /// Apply a deleted ad. Returns the removed ad, if it was known.
    pub fn apply_delete(&mut self, id: AdId) -> Option<Ad> {
        let index = self.ads.iter().position(|ad| ad.id == id)?;
        let ad = self.ads.remove(index);
        self.rederive();
        Some(ad)
    }

    /// Remove an ad locally ahead of the remote delete.
    pub fn begin_delete(&mut self, id: AdId) -> Option<PendingDelete> {
        let index = self.ads.iter().position(|ad| ad.id == id)?;
        let ad = self.ads.remove(index);
        self.rederive();
        Some(PendingDelete { ad, index })
    }

    /// The remote delete failed; put the ad back where it was.
    pub fn rollback_delete(&mut self, pending: PendingDelete) {
        let PendingDelete { ad, index } = pending;
        if self.ads.iter().any(|existing| existing.id == ad.id) {
            return;
        }
        let index = index.min(self.ads.len());
        self.ads.insert(index, ad);
        self.rederive();
    }

    /// A purchase went through: show the new ad and start a fresh selection.
    pub fn complete_booking(&mut self, ad: Ad) {
        self.selection.clear();
        self.apply_create(ad);
    }

    fn rederive(&mut self) {
        self.occupancy = Occupancy::build(&self.ads);
        self.selection.retain_free(&self.occupancy);
    }

    // --- Pointer events ---

    pub fn pointer_down(&mut self, cell: CellId) -> PointerOutcome {
        self.selection.pointer_down(cell, &self.occupancy)
    }

    pub fn pointer_enter(&mut self, cell: CellId) -> PointerOutcome {
        self.selection.pointer_enter(cell, &self.occupancy)
    }

    pub fn pointer_up(&mut self) -> PointerOutcome {
        self.selection.pointer_up()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- Theme ---

    /// Advance to the next theme and return it.
    pub fn cycle_theme(&mut self) -> Theme {
        self.theme = self.theme.next();
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Flip the animation setting and return the new value.
    pub fn toggle_animations(&mut self) -> bool {
        self.animations_enabled = !self.animations_enabled;
        self.animations_enabled
    }

    // --- Queries ---

    #[must_use]
    pub fn ads(&self) -> &[Ad] {
        &self.ads
    }

    #[must_use]
    pub fn ad(&self, id: AdId) -> Option<&Ad> {
        self.ads.iter().find(|ad| ad.id == id)
    }

    #[must_use]
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Malformed or overlapping ads in the current snapshot, for the host to log.
    #[must_use]
    pub fn integrity(&self) -> Integrity {
        Integrity {
            skipped: self.occupancy.skipped().to_vec(),
            shadowed: self.occupancy.shadowed().to_vec(),
        }
    }

    #[must_use]
    pub fn selection(&self) -> &CellSet {
        self.selection.selection()
    }

    #[must_use]
    pub fn controller(&self) -> &SelectionController {
        &self.selection
    }

    /// Whether the selection may be booked right now.
    #[must_use]
    pub fn is_selection_rectangular(&self) -> bool {
        is_rectangular(self.selection.selection())
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn animations_enabled(&self) -> bool {
        self.animations_enabled
    }

    /// How to draw `cell`.
    #[must_use]
    pub fn cell_view(&self, cell: CellId) -> CellView {
        match self.occupancy.cell_owner(cell) {
            None => CellView::Empty { selected: self.selection().contains(&cell) },
            Some(owner) => match self.occupancy.anchored_at(cell) {
                Some(placement) => CellView::AdAnchor(placement),
                None => CellView::Covered { ad_id: owner.ad_id },
            },
        }
    }

    /// Build the purchase payload from the current selection.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::EmptySelection`] or [`BookingError::NotRectangular`].
    pub fn booking(&self) -> Result<Booking, BookingError> {
        let selection = self.selection();
        let Some(bbox) = bounding_box(selection.iter().copied()) else {
            return Err(BookingError::EmptySelection);
        };
        if !is_rectangular(selection) {
            return Err(BookingError::NotRectangular);
        }
        Ok(Booking { plots: selection.iter().copied().collect(), bbox, aspect_ratio: bbox.aspect_ratio() })
    }
}
