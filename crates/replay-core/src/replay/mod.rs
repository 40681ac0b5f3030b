//! Trace replay: time-travel navigation over one solve's event log.
//!
//! A `ReplaySession` owns the trace and a cursor in `[-1, N-1]`; every
//! accepted cursor move recomputes the derived domain state and assignment
//! overlay from the start of the trace. The trace itself is never touched,
//! so every transition is reversible by moving the cursor back.

mod domains;
mod overlay;

pub use domains::{reconstruct_domains, DomainState};
pub use overlay::{reconstruct_overlay, AssignmentOverlay};

use crate::board::Board;
use crate::event::{Event, SolveReport, Trace, TraceError};

/// Errors constructing a replay session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The solver reported the board unsolvable; there is no trace to view.
    Unsolvable,
    /// The trace failed load-time validation.
    Trace(TraceError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsolvable => write!(f, "board is not solvable, no trace available"),
            Self::Trace(e) => write!(f, "invalid trace: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<TraceError> for SessionError {
    fn from(e: TraceError) -> Self {
        Self::Trace(e)
    }
}

/// Navigation controller for one viewing session.
///
/// Exclusively owns its trace for the session's lifetime; dropping the
/// session is the only cleanup. All operations are synchronous, pure
/// computations over in-memory data.
#[derive(Debug, Clone)]
pub struct ReplaySession {
    board: Board,
    trace: Trace,
    cursor: isize,
    domains: DomainState,
    overlay: AssignmentOverlay,
}

impl ReplaySession {
    /// Start a session at cursor `-1` (no events applied).
    pub fn new(board: Board, trace: Trace) -> Self {
        let domains = DomainState::initial(&board);
        Self {
            board,
            trace,
            cursor: -1,
            domains,
            overlay: AssignmentOverlay::new(),
        }
    }

    /// Build a session from a solver report, validating its trace against
    /// the board the solve started from.
    pub fn from_report(board: Board, report: &SolveReport) -> Result<Self, SessionError> {
        if !report.solvable {
            return Err(SessionError::Unsolvable);
        }
        let trace = Trace::from_events(&board, report.steps.clone())?;
        Ok(Self::new(board, trace))
    }

    /// Current cursor, `-1..=N-1`.
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn trace_len(&self) -> usize {
        self.trace.len()
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// The board the trace was produced from.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The event at the cursor; `None` at cursor `-1`.
    pub fn current_event(&self) -> Option<&Event> {
        if self.cursor < 0 {
            None
        } else {
            self.trace.get(self.cursor as usize)
        }
    }

    /// Derived domain state at the cursor.
    pub fn domains(&self) -> &DomainState {
        &self.domains
    }

    /// Derived assignment overlay at the cursor.
    pub fn overlay(&self) -> &AssignmentOverlay {
        &self.overlay
    }

    pub fn at_start(&self) -> bool {
        self.cursor == -1
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.trace.len() as isize - 1
    }

    /// Advance one event. Returns `false` (state untouched) at end of trace.
    pub fn step_forward(&mut self) -> bool {
        self.jump_to(self.cursor + 1)
    }

    /// Go back one event. Returns `false` (state untouched) at cursor `-1`.
    pub fn step_backward(&mut self) -> bool {
        self.jump_to(self.cursor - 1)
    }

    /// Move the cursor to `index` in `[-1, N-1]` and recompute derived
    /// state. Out-of-range requests are rejected without any state change.
    pub fn jump_to(&mut self, index: isize) -> bool {
        if index < -1 || index >= self.trace.len() as isize {
            return false;
        }
        self.cursor = index;
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        self.domains = reconstruct_domains(&self.board, self.trace.events(), self.cursor);
        self.overlay = reconstruct_overlay(self.trace.events(), self.cursor);
    }
}
