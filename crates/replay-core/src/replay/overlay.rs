//! Assignment-overlay reconstruction.
//!
//! The overlay tracks which cells currently hold a tentative search
//! assignment. A cell resolved purely by propagation never appears here; it
//! shows up as a singleton in the domain state instead, which is how the two
//! visually identical states are told apart.

use crate::board::Position;
use crate::event::Event;
use std::collections::BTreeMap;

/// Cells tentatively assigned by search, and the values they hold.
pub type AssignmentOverlay = BTreeMap<Position, u8>;

/// Rebuild the overlay after applying events `0..=upto` in order.
///
/// Assignments insert, reverts remove by cell identity. Trace validation
/// guarantees strict assign/revert pairing per cell, so identity matching is
/// unambiguous. `upto == -1` yields an empty overlay.
///
/// # Panics
///
/// Panics if `upto >= events.len() as isize`.
pub fn reconstruct_overlay(events: &[Event], upto: isize) -> AssignmentOverlay {
    let mut overlay = AssignmentOverlay::new();
    if upto < 0 {
        return overlay;
    }
    for event in &events[..=upto as usize] {
        match *event {
            Event::BacktrackAssign { cell, value } => {
                overlay.insert(cell, value);
            }
            Event::BacktrackRevert { cell, .. } => {
                overlay.remove(&cell);
            }
            Event::Arc { .. } | Event::ArcInferred { .. } => {}
        }
    }
    overlay
}
