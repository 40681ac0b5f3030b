//! Sudoku solving with a time-travel trace replay engine.
//!
//! The solver records every arc-consistency removal, forced inference,
//! tentative assignment, and backtracking revert into an immutable event
//! log. The replay engine turns any prefix of that log into the exact
//! per-cell candidate domains and tentative assignments at that point,
//! with forward, backward, and random-access navigation: a deterministic
//! step-through debugger for the search.

mod board;
mod domain;
mod event;
mod generator;
pub mod replay;
pub mod solver;

pub use board::{Board, BoardError, Position};
pub use domain::{DomainGrid, DomainSet};
pub use event::{Event, SolveReport, Trace, TraceError};
pub use generator::{Difficulty, Generator};
pub use replay::{
    reconstruct_domains, reconstruct_overlay, AssignmentOverlay, DomainState, ReplaySession,
    SessionError,
};
pub use solver::TracingSolver;
