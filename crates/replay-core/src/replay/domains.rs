//! Domain-state reconstruction.
//!
//! Replaying a prefix of the trace rebuilds the candidate domains of every
//! variable from scratch. Recomputing per query instead of patching deltas
//! is a correctness requirement, not laziness: domain shrinkage is not
//! invertible in general, so a revert can only be honored by restoring the
//! snapshot its event carries.

use crate::board::{Board, Position};
use crate::domain::DomainSet;
use crate::event::Event;
use std::collections::{BTreeMap, BTreeSet};

/// Per-variable candidate domains derived from a trace prefix.
///
/// Holds exactly one entry per cell that was empty at trace-start, at every
/// cursor position. Cells in the `degraded` set had their domain emptied by
/// a revert that carried no snapshot; their emptiness is information loss,
/// not a solver deduction, and callers must not read completeness into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainState {
    domains: BTreeMap<Position, DomainSet>,
    degraded: BTreeSet<Position>,
}

impl DomainState {
    /// The pristine state for a board: a full `{1..9}` domain per empty cell.
    pub fn initial(board: &Board) -> Self {
        let domains = board
            .empty_positions()
            .into_iter()
            .map(|pos| (pos, DomainSet::full()))
            .collect();
        Self {
            domains,
            degraded: BTreeSet::new(),
        }
    }

    /// Domain of a variable; `None` for cells filled at trace-start.
    pub fn get(&self, pos: Position) -> Option<DomainSet> {
        self.domains.get(&pos).copied()
    }

    /// Number of tracked variables.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// All variables and their domains, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, DomainSet)> + '_ {
        self.domains.iter().map(|(&pos, &d)| (pos, d))
    }

    /// Whether a cell's empty domain came from a snapshot-less revert.
    pub fn is_degraded(&self, pos: Position) -> bool {
        self.degraded.contains(&pos)
    }

    /// Cells whose domains were lost to snapshot-less reverts.
    pub fn degraded_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.degraded.iter().copied()
    }

    fn apply(&mut self, event: &Event) {
        match *event {
            Event::Arc { from, value, .. } => {
                // Untracked `from` cells (givens in doomed branches) are
                // skipped; removing an absent value is a no-op.
                if let Some(domain) = self.domains.get_mut(&from) {
                    domain.remove(value);
                }
            }
            Event::ArcInferred { cell, value } | Event::BacktrackAssign { cell, value } => {
                self.domains.insert(cell, DomainSet::singleton(value));
                self.degraded.remove(&cell);
            }
            Event::BacktrackRevert {
                domain_before: Some(snapshot),
                ..
            } => {
                // The snapshot is authoritative: every variable's domain is
                // replaced wholesale, not merged. The key set stays fixed to
                // the tracked variables.
                for (&pos, domain) in self.domains.iter_mut() {
                    *domain = snapshot.get(pos);
                }
                self.degraded.clear();
            }
            Event::BacktrackRevert {
                cell,
                domain_before: None,
                ..
            } => {
                // Degraded recovery: without the snapshot the pre-assignment
                // domain is unrecoverable, so the cell goes observably empty.
                self.domains.insert(cell, DomainSet::empty());
                self.degraded.insert(cell);
            }
        }
    }
}

/// Rebuild the domain state after applying events `0..=upto` in order.
///
/// `upto == -1` yields the pristine initial state. Deterministic and free of
/// side effects; inputs are never mutated.
///
/// # Panics
///
/// Panics if `upto >= events.len() as isize`.
pub fn reconstruct_domains(board: &Board, events: &[Event], upto: isize) -> DomainState {
    let mut state = DomainState::initial(board);
    if upto < 0 {
        return state;
    }
    for event in &events[..=upto as usize] {
        state.apply(event);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainGrid;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    /// The worked example trace: arc removal, inference, assignment, and a
    /// snapshot-less revert.
    fn example_events() -> Vec<Event> {
        vec![
            Event::Arc {
                from: pos(0, 0),
                to: pos(0, 1),
                value: 5,
            },
            Event::ArcInferred {
                cell: pos(0, 0),
                value: 3,
            },
            Event::BacktrackAssign {
                cell: pos(1, 1),
                value: 7,
            },
            Event::BacktrackRevert {
                cell: pos(1, 1),
                value: 7,
                domain_before: None,
            },
        ]
    }

    #[test]
    fn test_boundary_at_minus_one() {
        let board = Board::empty();
        let state = reconstruct_domains(&board, &example_events(), -1);
        assert_eq!(state.len(), 81);
        for (_, domain) in state.iter() {
            assert_eq!(domain, DomainSet::full());
        }
    }

    #[test]
    fn test_example_trace_per_cursor() {
        let board = Board::empty();
        let events = example_events();

        let at0 = reconstruct_domains(&board, &events, 0);
        assert_eq!(at0.get(pos(0, 0)).unwrap().to_vec(), vec![1, 2, 4, 6, 7, 8, 9]);

        let at1 = reconstruct_domains(&board, &events, 1);
        assert_eq!(at1.get(pos(0, 0)).unwrap().to_vec(), vec![3]);

        let at2 = reconstruct_domains(&board, &events, 2);
        assert_eq!(at2.get(pos(1, 1)).unwrap().to_vec(), vec![7]);

        let at3 = reconstruct_domains(&board, &events, 3);
        assert!(at3.get(pos(1, 1)).unwrap().is_empty());
        assert!(at3.is_degraded(pos(1, 1)));
        // The inference at step 1 is untouched by the fallback revert.
        assert_eq!(at3.get(pos(0, 0)).unwrap().to_vec(), vec![3]);
    }

    #[test]
    fn test_determinism() {
        let board = Board::empty();
        let events = example_events();
        let a = reconstruct_domains(&board, &events, 3);
        let b = reconstruct_domains(&board, &events, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_idempotent_arc_removal() {
        let board = Board::empty();
        let events = vec![
            Event::Arc {
                from: pos(0, 0),
                to: pos(0, 1),
                value: 5,
            },
            Event::Arc {
                from: pos(0, 0),
                to: pos(0, 2),
                value: 5,
            },
        ];
        let once = reconstruct_domains(&board, &events, 0);
        let twice = reconstruct_domains(&board, &events, 1);
        assert_eq!(once.get(pos(0, 0)), twice.get(pos(0, 0)));
    }

    #[test]
    fn test_arc_on_filled_cell_is_ignored() {
        let mut board = Board::empty();
        board.set(pos(0, 0), 5);
        let events = vec![Event::Arc {
            from: pos(0, 0),
            to: pos(0, 1),
            value: 5,
        }];
        let state = reconstruct_domains(&board, &events, 0);
        assert_eq!(state.get(pos(0, 0)), None);
        assert_eq!(state.len(), 80);
    }

    #[test]
    fn test_snapshot_authority() {
        let board = Board::empty();
        let c = pos(1, 1);
        let d = pos(2, 2);

        // The snapshot diverges from anything replay arithmetic could
        // produce: cell d is narrowed even though nothing "undoes" step 1.
        let mut snapshot = DomainGrid::full();
        snapshot.set(c, [4, 7, 9].into_iter().collect());
        snapshot.set(d, [2, 8].into_iter().collect());

        let events = vec![
            Event::BacktrackAssign { cell: c, value: 7 },
            Event::ArcInferred { cell: d, value: 2 },
            Event::BacktrackRevert {
                cell: c,
                value: 7,
                domain_before: Some(snapshot),
            },
        ];

        let state = reconstruct_domains(&board, &events, 2);
        assert_eq!(state.get(c).unwrap().to_vec(), vec![4, 7, 9]);
        assert_eq!(state.get(d).unwrap().to_vec(), vec![2, 8]);
        // Every other variable took the snapshot value too.
        assert_eq!(state.get(pos(8, 8)).unwrap(), DomainSet::full());
        assert_eq!(state.degraded_cells().count(), 0);
    }

    #[test]
    fn test_snapshot_restore_clears_degraded() {
        let board = Board::empty();
        let c = pos(1, 1);
        let events = vec![
            Event::BacktrackAssign { cell: c, value: 7 },
            Event::BacktrackRevert {
                cell: c,
                value: 7,
                domain_before: None,
            },
            Event::BacktrackAssign { cell: c, value: 8 },
            Event::BacktrackRevert {
                cell: c,
                value: 8,
                domain_before: Some(DomainGrid::full()),
            },
        ];
        let degraded = reconstruct_domains(&board, &events, 1);
        assert!(degraded.is_degraded(c));

        // A later singleton event un-degrades the cell.
        let reassigned = reconstruct_domains(&board, &events, 2);
        assert!(!reassigned.is_degraded(c));

        let restored = reconstruct_domains(&board, &events, 3);
        assert!(!restored.is_degraded(c));
        assert_eq!(restored.get(c).unwrap(), DomainSet::full());
    }

    #[test]
    fn test_monotonic_singleton_convergence() {
        let board = Board::empty();
        let c = pos(0, 0);
        let events = vec![
            Event::ArcInferred { cell: c, value: 3 },
            Event::Arc {
                from: pos(0, 1),
                to: c,
                value: 3,
            },
            Event::Arc {
                from: c,
                to: pos(0, 1),
                value: 9,
            },
            Event::BacktrackAssign {
                cell: pos(5, 5),
                value: 1,
            },
        ];
        // Once singleton, the domain stays the singleton {3} at every later
        // index (the removal of 9 at step 2 is a no-op on {3}).
        for upto in 0..events.len() as isize {
            let state = reconstruct_domains(&board, &events, upto);
            assert_eq!(state.get(c).unwrap().to_vec(), vec![3], "at index {}", upto);
        }
    }
}
