//! Occupied-plot index derived from the ad list.
//!
//! DESIGN
//! ======
//! `Occupancy` is rebuilt from a full ad snapshot whenever the list changes;
//! it is never patched in place. Each plot has a fixed slot in a row-major
//! table, so occupancy and owner lookups are O(1). Each ad also gets one
//! `Placement` (its bounding box) so the renderer can draw one unit per ad
//! from its top-left plot and skip the plots that unit spans.
//!
//! OVERLAP POLICY
//! ==============
//! The purchase path guarantees ads never share a plot. If that guarantee
//! is broken upstream, the ad appearing later in the input wins the shared
//! plots, including their render trigger, and the earlier ad is reported in
//! [`Occupancy::shadowed`] so the host can log the integrity fault. Ads with
//! no plots are skipped and reported in [`Occupancy::skipped`].

#[cfg(test)]
#[path = "occupancy_test.rs"]
mod occupancy_test;

use serde::Serialize;

use crate::ad::{Ad, AdId};
use crate::cell::{CellId, CellSet};
use crate::consts::GRID_CELLS;
use crate::rect::CellRect;

/// Where one ad is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub ad_id: AdId,
    pub bbox: CellRect,
}

/// Owner of an occupied plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellOwner {
    pub ad_id: AdId,
    /// True for the ad's top-left plot, which draws the whole ad.
    pub is_anchor: bool,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    entry: usize,
    is_anchor: bool,
}

/// Occupied plots and per-ad placements for one ad snapshot.
#[derive(Debug, Clone)]
pub struct Occupancy {
    slots: Vec<Option<Slot>>,
    entries: Vec<Placement>,
    skipped: Vec<AdId>,
    shadowed: Vec<AdId>,
}

impl Occupancy {
    /// An empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: vec![None; GRID_CELLS], entries: Vec::new(), skipped: Vec::new(), shadowed: Vec::new() }
    }

    /// Flatten every ad's plots into the index.
    #[must_use]
    pub fn build(ads: &[Ad]) -> Self {
        let mut occ = Self::new();
        for ad in ads {
            let (Some(anchor), Some(bbox)) = (ad.top_left(), ad.bounding_box()) else {
                occ.skipped.push(ad.id);
                continue;
            };

            let entry = occ.entries.len();
            occ.entries.push(Placement { ad_id: ad.id, bbox });

            for &cell in &ad.plots {
                let slot = Slot { entry, is_anchor: cell == anchor };
                if let Some(previous) = occ.slots[cell.index()].replace(slot) {
                    let loser = occ.entries[previous.entry].ad_id;
                    if !occ.shadowed.contains(&loser) {
                        occ.shadowed.push(loser);
                    }
                }
            }
        }
        occ
    }

    /// Whether any ad covers `cell`.
    #[must_use]
    pub fn is_occupied(&self, cell: CellId) -> bool {
        self.slots[cell.index()].is_some()
    }

    /// The ad covering `cell`, and whether `cell` is that ad's render trigger.
    #[must_use]
    pub fn cell_owner(&self, cell: CellId) -> Option<CellOwner> {
        self.slots[cell.index()].map(|slot| CellOwner {
            ad_id: self.entries[slot.entry].ad_id,
            is_anchor: slot.is_anchor,
        })
    }

    /// Placement of the ad anchored at `cell`, if `cell` is a render trigger.
    #[must_use]
    pub fn anchored_at(&self, cell: CellId) -> Option<Placement> {
        self.slots[cell.index()]
            .filter(|slot| slot.is_anchor)
            .map(|slot| self.entries[slot.entry])
    }

    /// Draw plan: one placement per ad that still holds its render trigger,
    /// in row-major order of the trigger plot.
    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        CellId::all().filter_map(|cell| self.anchored_at(cell))
    }

    /// Whether any plot in `cells` is taken.
    pub fn any_occupied<I>(&self, cells: I) -> bool
    where
        I: IntoIterator<Item = CellId>,
    {
        cells.into_iter().any(|cell| self.is_occupied(cell))
    }

    /// The taken plots among `cells`, row-major.
    #[must_use]
    pub fn overlapping(&self, cells: &CellSet) -> Vec<CellId> {
        cells.iter().copied().filter(|&cell| self.is_occupied(cell)).collect()
    }

    /// The occupancy set: every covered plot.
    #[must_use]
    pub fn cells(&self) -> CellSet {
        CellId::all().filter(|&cell| self.is_occupied(cell)).collect()
    }

    /// Number of covered plots.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Ads ignored because they had no plots.
    #[must_use]
    pub fn skipped(&self) -> &[AdId] {
        &self.skipped
    }

    /// Ads that lost at least one plot to a later, overlapping ad.
    #[must_use]
    pub fn shadowed(&self) -> &[AdId] {
        &self.shadowed
    }
}

impl Default for Occupancy {
    fn default() -> Self {
        Self::new()
    }
}
