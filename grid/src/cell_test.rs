use super::*;
use crate::consts::GRID_CELLS;

// =============================================================
// Construction
// =============================================================

#[test]
fn new_accepts_grid_corners() {
    let top_left = CellId::new(0, 0).unwrap();
    let bottom_right = CellId::new(13, 27).unwrap();
    assert_eq!((top_left.row(), top_left.col()), (0, 0));
    assert_eq!((bottom_right.row(), bottom_right.col()), (13, 27));
}

#[test]
fn new_rejects_row_past_grid() {
    assert_eq!(CellId::new(14, 0), Err(CellIdError::OutOfBounds { row: 14, col: 0 }));
}

#[test]
fn new_rejects_col_past_grid() {
    assert_eq!(CellId::new(0, 28), Err(CellIdError::OutOfBounds { row: 0, col: 28 }));
}

#[test]
fn equality_requires_row_and_col() {
    let a = CellId::new(2, 3).unwrap();
    assert_eq!(a, CellId::new(2, 3).unwrap());
    assert_ne!(a, CellId::new(3, 2).unwrap());
    assert_ne!(a, CellId::new(2, 4).unwrap());
}

// =============================================================
// Text form
// =============================================================

#[test]
fn display_uses_row_dash_col() {
    assert_eq!(CellId::new(3, 14).unwrap().to_string(), "3-14");
}

#[test]
fn parse_reads_row_dash_col() {
    let cell: CellId = "7-21".parse().unwrap();
    assert_eq!((cell.row(), cell.col()), (7, 21));
}

#[test]
fn parse_rejects_missing_separator() {
    assert_eq!("712".parse::<CellId>(), Err(CellIdError::MissingSeparator("712".into())));
}

#[test]
fn parse_rejects_non_numeric() {
    assert_eq!("a-1".parse::<CellId>(), Err(CellIdError::InvalidNumber("a-1".into())));
    assert_eq!("1-".parse::<CellId>(), Err(CellIdError::InvalidNumber("1-".into())));
}

#[test]
fn parse_rejects_negative_row() {
    assert!(matches!("-1-2".parse::<CellId>(), Err(CellIdError::InvalidNumber(_))));
}

#[test]
fn parse_rejects_out_of_bounds() {
    assert_eq!("14-0".parse::<CellId>(), Err(CellIdError::OutOfBounds { row: 14, col: 0 }));
}

#[test]
fn parse_all_stops_at_first_bad_id() {
    let err = parse_all(&["0-0", "0-x", "99-99"]).unwrap_err();
    assert_eq!(err, CellIdError::InvalidNumber("0-x".into()));
}

#[test]
fn serde_uses_text_form() {
    let cell = CellId::new(1, 2).unwrap();
    assert_eq!(serde_json::to_string(&cell).unwrap(), "\"1-2\"");
    let back: CellId = serde_json::from_str("\"1-2\"").unwrap();
    assert_eq!(back, cell);
}

#[test]
fn serde_rejects_bad_text() {
    assert!(serde_json::from_str::<CellId>("\"30-1\"").is_err());
}

// =============================================================
// Ordering and enumeration
// =============================================================

#[test]
fn ordering_is_row_major() {
    let end_of_row = CellId::new(0, 27).unwrap();
    let next_row = CellId::new(1, 0).unwrap();
    assert!(end_of_row < next_row);
}

#[test]
fn all_covers_grid_in_row_major_order() {
    let cells: Vec<CellId> = CellId::all().collect();
    assert_eq!(cells.len(), GRID_CELLS);
    assert_eq!(cells[0], CellId::new(0, 0).unwrap());
    assert_eq!(cells[28], CellId::new(1, 0).unwrap());
    assert!(cells.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn index_matches_enumeration_position() {
    for (i, cell) in CellId::all().enumerate() {
        assert_eq!(cell.index(), i);
    }
}
