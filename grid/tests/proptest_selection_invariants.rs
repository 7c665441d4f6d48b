//! Property-based invariant tests for the grid engine.
//!
//! Verifies:
//! 1. `is_rectangular` agrees with a brute-force cross-product check on
//!    arbitrary unions of one to three rectangles
//! 2. Any single solid rectangle is rectangular
//! 3. Two rectangles separated by a free column never are
//! 4. A drag never selects an occupied plot, and every accepted drag
//!    position yields exactly the rectangle spanned from the anchor
//! 5. Occupancy built from non-overlapping ads has one render trigger per ad

use std::collections::BTreeSet;

use grid::ad::Ad;
use grid::cell::{CellId, CellSet};
use grid::consts::{GRID_COLS, GRID_ROWS};
use grid::occupancy::Occupancy;
use grid::rect::{CellRect, is_rectangular, rectangle_between};
use grid::selection::{PointerOutcome, SelectionController};
use proptest::prelude::*;
use uuid::Uuid;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_cell() -> impl Strategy<Value = CellId> {
    (0..u32::from(GRID_ROWS), 0..u32::from(GRID_COLS))
        .prop_map(|(r, c)| CellId::new(r, c).unwrap())
}

fn arb_rect() -> impl Strategy<Value = CellRect> {
    (arb_cell(), arb_cell()).prop_map(|(a, b)| rectangle_between(a, b))
}

fn cells_of(rect: CellRect) -> CellSet {
    rect.cells().collect()
}

fn brute_force_rectangular(cells: &CellSet) -> bool {
    let Some(first) = cells.iter().next() else {
        return false;
    };
    let (mut r0, mut r1, mut c0, mut c1) = (first.row(), first.row(), first.col(), first.col());
    for cell in cells {
        r0 = r0.min(cell.row());
        r1 = r1.max(cell.row());
        c0 = c0.min(cell.col());
        c1 = c1.max(cell.col());
    }
    (r0..=r1).all(|r| (c0..=c1).all(|c| cells.contains(&CellId::new(r.into(), c.into()).unwrap())))
}

fn ad_over(rect: CellRect) -> Ad {
    Ad::new(Uuid::new_v4(), rect.cells(), "u", "m", None)
}

// ── 1-3. Rectangularity ───────────────────────────────────────────────

proptest! {
    #[test]
    fn union_matches_brute_force(rects in prop::collection::vec(arb_rect(), 1..=3)) {
        let union: CellSet = rects.iter().flat_map(|&r| r.cells()).collect();
        prop_assert_eq!(is_rectangular(&union), brute_force_rectangular(&union));
    }

    #[test]
    fn solid_rectangle_is_rectangular(rect in arb_rect()) {
        prop_assert!(is_rectangular(&cells_of(rect)));
    }

    #[test]
    fn single_cell_is_rectangular(cell in arb_cell()) {
        prop_assert!(is_rectangular(&BTreeSet::from([cell])));
    }

    #[test]
    fn rectangles_split_by_a_gap_are_not_rectangular(
        r0 in 0u32..14, r1 in 0u32..14, r2 in 0u32..14, r3 in 0u32..14,
        left in 0u32..=12, right in 14u32..28,
    ) {
        let a = rectangle_between(
            CellId::new(r0, 0).unwrap(),
            CellId::new(r1, left).unwrap(),
        );
        let b = rectangle_between(
            CellId::new(r2, right).unwrap(),
            CellId::new(r3, 27).unwrap(),
        );
        let union: CellSet = a.cells().chain(b.cells()).collect();
        prop_assert!(!is_rectangular(&union));
    }
}

// ── 4. Drag over occupied plots ───────────────────────────────────────

proptest! {
    #[test]
    fn drag_never_selects_occupied_plots(
        taken in arb_rect(),
        anchor in arb_cell(),
        path in prop::collection::vec(arb_cell(), 1..12),
    ) {
        let occupancy = Occupancy::build(&[ad_over(taken)]);
        prop_assume!(!occupancy.is_occupied(anchor));

        let mut ctl = SelectionController::new();
        prop_assert_eq!(ctl.pointer_down(anchor, &occupancy), PointerOutcome::DragStarted);

        let mut last_accepted: Option<CellRect> = None;
        for cell in path {
            match ctl.pointer_enter(cell, &occupancy) {
                PointerOutcome::Selected(rect) => {
                    prop_assert_eq!(rect, rectangle_between(anchor, cell));
                    last_accepted = Some(rect);
                }
                PointerOutcome::Blocked => {
                    prop_assert!(rectangle_between(anchor, cell).cells().any(|c| occupancy.is_occupied(c)));
                }
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            }
            prop_assert!(ctl.selection().iter().all(|&c| !occupancy.is_occupied(c)));
            match last_accepted {
                Some(rect) => prop_assert_eq!(ctl.selection(), &cells_of(rect)),
                None => prop_assert!(ctl.selection().is_empty()),
            }
        }
        ctl.pointer_up();
        prop_assert!(!ctl.is_dragging());
    }
}

// ── 5. Occupancy render triggers ──────────────────────────────────────

fn arb_rect_in_rows(rows: std::ops::Range<u32>) -> impl Strategy<Value = CellRect> {
    let corner = move || (rows.clone(), 0..u32::from(GRID_COLS)).prop_map(|(r, c)| CellId::new(r, c).unwrap());
    (corner(), corner()).prop_map(|(a, b)| rectangle_between(a, b))
}

proptest! {
    #[test]
    fn one_trigger_per_disjoint_ad(upper in arb_rect_in_rows(0..7), lower in arb_rect_in_rows(7..14)) {
        let ads = [ad_over(upper), ad_over(lower)];
        let occupancy = Occupancy::build(&ads);

        prop_assert_eq!(occupancy.placements().count(), 2);
        prop_assert!(occupancy.shadowed().is_empty());
        prop_assert_eq!(occupancy.occupied_count(), upper.area() + lower.area());
        for ad in &ads {
            let placement = occupancy.placements().find(|p| p.ad_id == ad.id);
            prop_assert!(placement.is_some());
            prop_assert_eq!(occupancy.anchored_at(ad.plots[0]), placement);
        }
    }
}
