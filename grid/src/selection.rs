//! Selection gesture state machine.
//!
//! `SelectionController` turns the pointer events delivered by the host into
//! a selection of free plots. A press starts a drag session anchored at the
//! pressed plot; each plot the pointer enters replaces the selection with the
//! rectangle between the anchor and that plot, unless the rectangle would
//! cover a taken plot, in which case the last valid rectangle stays. A press
//! and release that never leaves the anchor is a click and toggles the anchor
//! in the selection as it stood when the press began.
//!
//! The controller never reads the ad list itself. Every transition that needs
//! to know which plots are taken receives the current [`Occupancy`].

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::cell::{CellId, CellSet};
use crate::occupancy::Occupancy;
use crate::rect::{CellRect, is_rectangular, rectangle_between};

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The pointer is held down over the grid.
    Dragging {
        /// Plot where the press started; one corner of every drag rectangle.
        anchor: CellId,
        /// Whether the pointer has entered any plot other than the anchor.
        has_moved: bool,
        /// Selection as it stood before the press; a click toggles against this.
        snapshot: CellSet,
    },
}

/// What a pointer event did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// The event does not apply in the current state.
    Ignored,
    /// A drag session began. The selection is unchanged until the pointer moves or lifts.
    DragStarted,
    /// The selection was replaced by this rectangle.
    Selected(CellRect),
    /// The rectangle for this pointer position covers a taken plot; the
    /// previous selection is kept.
    Blocked,
    /// A click was released and the anchor plot was added or removed.
    Toggled { cell: CellId, selected: bool },
    /// A drag was released; the last valid rectangle stays selected.
    Released,
}

/// Owns the selection and the drag session for one interactive session.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selection: CellSet,
    state: DragState,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    /// The current selection, row-major.
    #[must_use]
    pub fn selection(&self) -> &CellSet {
        &self.selection
    }

    /// The current gesture state.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Whether the selection is a solid rectangle and may be booked.
    #[must_use]
    pub fn is_rectangular(&self) -> bool {
        is_rectangular(&self.selection)
    }

    // --- Pointer events ---

    /// Press on `cell`. Taken plots never start a gesture.
    pub fn pointer_down(&mut self, cell: CellId, occupancy: &Occupancy) -> PointerOutcome {
        if occupancy.is_occupied(cell) {
            return PointerOutcome::Ignored;
        }
        self.state = DragState::Dragging { anchor: cell, has_moved: false, snapshot: self.selection.clone() };
        PointerOutcome::DragStarted
    }

    /// Pointer entered `cell` while possibly dragging.
    pub fn pointer_enter(&mut self, cell: CellId, occupancy: &Occupancy) -> PointerOutcome {
        let DragState::Dragging { anchor, has_moved, .. } = &mut self.state else {
            return PointerOutcome::Ignored;
        };
        if cell != *anchor {
            *has_moved = true;
        }

        let rect = rectangle_between(*anchor, cell);
        if occupancy.any_occupied(rect.cells()) {
            return PointerOutcome::Blocked;
        }
        self.selection = rect.cells().collect();
        PointerOutcome::Selected(rect)
    }

    /// Pointer released anywhere, on or off the grid.
    pub fn pointer_up(&mut self) -> PointerOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => PointerOutcome::Ignored,
            DragState::Dragging { has_moved: true, .. } => PointerOutcome::Released,
            DragState::Dragging { anchor, has_moved: false, mut snapshot } => {
                let selected = if snapshot.remove(&anchor) {
                    false
                } else {
                    snapshot.insert(anchor);
                    true
                };
                self.selection = snapshot;
                PointerOutcome::Toggled { cell: anchor, selected }
            }
        }
    }

    // --- Host actions ---

    /// Empty the selection and abandon any gesture.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.state = DragState::Idle;
    }

    /// Drop selected plots that have since been bought. Returns the dropped plots.
    pub fn retain_free(&mut self, occupancy: &Occupancy) -> Vec<CellId> {
        let taken = occupancy.overlapping(&self.selection);
        for cell in &taken {
            self.selection.remove(cell);
        }
        if let DragState::Dragging { snapshot, .. } = &mut self.state {
            snapshot.retain(|&cell| !occupancy.is_occupied(cell));
        }
        taken
    }
}
