//! Solver front-end.
//!
//! `TracingSolver` runs arc consistency + backtracking search and records
//! the full event log the replay engine consumes. The `backtrack` module
//! holds the plain (non-recording) search used for solvability checks,
//! solution counting, and generation.

mod arc;
pub mod backtrack;

use crate::board::{Board, Position};
use crate::domain::DomainGrid;
use crate::event::{Event, SolveReport};
use std::time::Instant;

/// Stateless solver front-end; all working state is per-call.
pub struct TracingSolver;

impl Default for TracingSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingSolver {
    pub fn new() -> Self {
        Self
    }

    /// Solve the board, recording every propagation and search event.
    ///
    /// Arc consistency is re-applied at every search depth; each tentative
    /// assignment captures the post-propagation domain grid and emits it as
    /// the `domain_before` snapshot on the matching revert, so replay can
    /// restore the exact pre-assignment state.
    pub fn solve(&self, board: &Board) -> SolveReport {
        let start = Instant::now();
        let mut steps = Vec::new();
        let solution = self.search(*board, &mut steps);
        let time_taken_ms = start.elapsed().as_secs_f64() * 1000.0;

        let solvable = solution.is_some();
        if !solvable {
            // An unsolvable board yields no trace for viewing.
            steps.clear();
        }
        let num_steps = steps.len();
        SolveReport {
            solvable,
            steps,
            solution,
            num_steps,
            time_taken_ms,
        }
    }

    fn search(&self, board: Board, steps: &mut Vec<Event>) -> Option<Board> {
        let outcome = arc::propagate(&board, steps);
        if !outcome.consistent {
            return None;
        }
        if outcome.complete {
            return Some(outcome.board);
        }
        let board = outcome.board;
        let snapshot = outcome.domains;

        let Some(cell) = best_cell(&board, &snapshot) else {
            return Some(board);
        };

        for value in snapshot.get(cell).iter() {
            if !board.is_safe(cell, value) {
                continue;
            }
            let mut next = board;
            next.set(cell, value);
            steps.push(Event::BacktrackAssign { cell, value });

            if let Some(solved) = self.search(next, steps) {
                return Some(solved);
            }

            steps.push(Event::BacktrackRevert {
                cell,
                value,
                domain_before: Some(snapshot),
            });
        }
        None
    }
}

/// Empty cell with the smallest non-empty domain (minimum remaining values).
fn best_cell(board: &Board, domains: &DomainGrid) -> Option<Position> {
    let mut best: Option<(Position, u32)> = None;
    for row in 0..9 {
        for col in 0..9 {
            let pos = Position::new(row, col);
            if !board.is_empty_cell(pos) {
                continue;
            }
            let len = domains.get(pos).len();
            if len == 0 {
                continue;
            }
            match best {
                Some((_, best_len)) if best_len <= len => {}
                _ => {
                    if len == 1 {
                        return Some(pos);
                    }
                    best = Some((pos, len));
                }
            }
        }
    }
    best.map(|(pos, _)| pos)
}
