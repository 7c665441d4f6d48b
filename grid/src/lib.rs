//! Grid occupancy and selection engine for the digital billboard.
//!
//! This crate runs both in the browser (compiled to WebAssembly) and inside
//! the server. It owns the parts of the billboard with real invariants:
//! mapping purchased ads onto the 28x14 plot grid, turning pointer gestures
//! into a rectangular selection of free plots, and deciding whether a
//! selection is a solid rectangle that may be booked. Everything else
//! (uploads, persistence, auth) happens in the host and reaches this crate
//! only as an updated ad list or a pointer event.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`cell`] | Plot identifiers and their `"row-col"` text form |
//! | [`ad`] | Published ads and their normalized plot lists |
//! | [`rect`] | Cell rectangles and the rectangularity check |
//! | [`occupancy`] | Occupied-plot index, owners, and render placements |
//! | [`selection`] | Pointer gesture state machine producing the selection |
//! | [`board`] | Session core tying ads, selection, and theme together |
//! | [`theme`] | Closed set of background themes and their decorations |
//! | [`wasm`] | `wasm-bindgen` handle for the browser shell |
//! | [`consts`] | Grid dimensions and content limits |

pub mod ad;
pub mod board;
pub mod cell;
pub mod consts;
pub mod occupancy;
pub mod rect;
pub mod selection;
pub mod theme;
pub mod wasm;
