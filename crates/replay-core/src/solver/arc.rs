//! Arc-consistency propagation.
//!
//! Queue-driven pass over the constraint graph: every filled cell removes
//! its value from the domains of its row, column, and box peers. Each
//! removal is recorded as an `Arc` event; a domain forced down to one value
//! is written back to the board and recorded as `ArcInferred`, enqueueing
//! the cell for further propagation.

use crate::board::{Board, Position};
use crate::domain::{DomainGrid, DomainSet};
use crate::event::Event;
use std::collections::VecDeque;

/// Result of one propagation pass.
pub(crate) struct ArcOutcome {
    /// Input board plus any inferred values.
    pub board: Board,
    /// Domains after propagation (singletons for filled cells).
    pub domains: DomainGrid,
    /// False if some cell's domain was emptied (contradiction).
    pub consistent: bool,
    /// True if every cell ended up assigned.
    pub complete: bool,
}

/// Run propagation to fixpoint (or contradiction), appending the recorded
/// events to `steps`.
pub(crate) fn propagate(board: &Board, steps: &mut Vec<Event>) -> ArcOutcome {
    let mut board = *board;
    let mut domains = DomainGrid::full();
    let mut arced = [[false; 9]; 9];
    let mut queue: VecDeque<Position> = VecDeque::new();
    let mut assigned = 0usize;

    for row in 0..9 {
        for col in 0..9 {
            let pos = Position::new(row, col);
            if let Some(v) = board.value(pos) {
                domains.set(pos, DomainSet::singleton(v));
                queue.push_back(pos);
                assigned += 1;
            }
        }
    }

    while let Some(cur) = queue.pop_front() {
        arced[cur.row][cur.col] = true;
        let value = board.get(cur);

        // Row, then column, then box, in that order; box peers overlapping
        // the row/column are revisited but the removal is idempotent.
        let mut peers: Vec<Position> = Vec::with_capacity(24);
        for k in 0..9 {
            if k != cur.col {
                peers.push(Position::new(cur.row, k));
            }
        }
        for k in 0..9 {
            if k != cur.row {
                peers.push(Position::new(k, cur.col));
            }
        }
        let box_row = cur.row - cur.row % 3;
        let box_col = cur.col - cur.col % 3;
        for r in box_row..box_row + 3 {
            for c in box_col..box_col + 3 {
                if r != cur.row || c != cur.col {
                    peers.push(Position::new(r, c));
                }
            }
        }

        for peer in peers {
            let mut domain = domains.get(peer);
            if !domain.contains(value) {
                continue;
            }
            domain.remove(value);
            domains.set(peer, domain);
            steps.push(Event::Arc {
                from: peer,
                to: cur,
                value,
            });

            if domain.is_singleton() && !arced[peer.row][peer.col] {
                queue.push_back(peer);
                let inferred = domain.sole_value().unwrap();
                board.set(peer, inferred);
                assigned += 1;
                steps.push(Event::ArcInferred {
                    cell: peer,
                    value: inferred,
                });
            }
            if domain.is_empty() {
                return ArcOutcome {
                    board,
                    domains,
                    consistent: false,
                    complete: false,
                };
            }
        }
    }

    ArcOutcome {
        board,
        domains,
        consistent: true,
        complete: assigned == 81,
    }
}
