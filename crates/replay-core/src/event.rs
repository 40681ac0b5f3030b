//! Trace events and the immutable trace.
//!
//! The solver records one event per domain removal, forced inference, or
//! search decision. Events carry absolute coordinates so that replaying any
//! prefix of the log is unambiguous; the closed set of four variants is the
//! entire vocabulary of a trace.

use crate::board::{Board, Position};
use crate::domain::DomainGrid;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One step of the solver's propagation/search log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Arc-consistency removed `value` from `from`'s domain because of a
    /// constraint with `to`.
    Arc {
        from: Position,
        to: Position,
        value: u8,
    },
    /// Propagation forced `cell`'s domain down to the singleton `{value}`.
    ArcInferred { cell: Position, value: u8 },
    /// Search tentatively assigned `value` to `cell`.
    BacktrackAssign { cell: Position, value: u8 },
    /// Search undid the assignment at `cell`. When present, `domain_before`
    /// is the exact domain of every cell captured immediately before the
    /// assignment was attempted; traces from older producers omit it.
    BacktrackRevert {
        cell: Position,
        value: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        domain_before: Option<DomainGrid>,
    },
}

impl Event {
    /// Short human-readable name of the variant.
    pub fn label(&self) -> &'static str {
        match self {
            Event::Arc { .. } => "Arc Consistency",
            Event::ArcInferred { .. } => "Arc Inferred",
            Event::BacktrackAssign { .. } => "Backtrack Assign",
            Event::BacktrackRevert { .. } => "Backtrack Revert",
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Arc { from, to, value } => {
                write!(f, "remove {} from {} due to {}", value, from, to)
            }
            Event::ArcInferred { cell, value } => {
                write!(f, "infer {} at {}", value, cell)
            }
            Event::BacktrackAssign { cell, value } => {
                write!(f, "assign {} to {}", value, cell)
            }
            Event::BacktrackRevert {
                cell,
                value,
                domain_before,
            } => {
                if domain_before.is_some() {
                    write!(f, "revert {} from {} (restore snapshot)", value, cell)
                } else {
                    write!(f, "revert {} from {}", value, cell)
                }
            }
        }
    }
}

/// Errors rejecting a trace at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// An event referenced a coordinate outside the grid.
    PositionOutOfRange { index: usize, row: usize, col: usize },
    /// An event carried a value outside `1..=9`.
    ValueOutOfRange { index: usize, value: u8 },
    /// An inference or search event referenced a cell that was filled at
    /// trace-start and is therefore not a tracked variable.
    NotAVariable { index: usize, cell: Position },
    /// A cell was assigned a second time before being reverted.
    DoubleAssign { index: usize, cell: Position },
    /// A revert arrived for a cell that held no tentative assignment.
    RevertWithoutAssign { index: usize, cell: Position },
    /// A revert's value disagreed with the assignment it undoes.
    RevertValueMismatch {
        index: usize,
        cell: Position,
        assigned: u8,
        reverted: u8,
    },
}

impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PositionOutOfRange { index, row, col } => {
                write!(f, "event {}: position ({}, {}) outside grid", index, row, col)
            }
            Self::ValueOutOfRange { index, value } => {
                write!(f, "event {}: value {} outside 1-9", index, value)
            }
            Self::NotAVariable { index, cell } => {
                write!(f, "event {}: cell {} was filled at trace-start", index, cell)
            }
            Self::DoubleAssign { index, cell } => {
                write!(f, "event {}: cell {} assigned twice without revert", index, cell)
            }
            Self::RevertWithoutAssign { index, cell } => {
                write!(f, "event {}: revert of unassigned cell {}", index, cell)
            }
            Self::RevertValueMismatch {
                index,
                cell,
                assigned,
                reverted,
            } => write!(
                f,
                "event {}: revert of {} at {} but {} was assigned",
                index, reverted, cell, assigned
            ),
        }
    }
}

impl std::error::Error for TraceError {}

/// An immutable, validated solver trace.
///
/// Constructed exactly once per solve; navigation only ever moves a cursor
/// over it, never edits it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    events: Vec<Event>,
}

impl Trace {
    /// Validate `events` against the board the solve started from and seal
    /// them into a trace.
    ///
    /// Checks coordinate and value ranges on every event, that inference and
    /// search events only touch cells empty at trace-start, and that each
    /// cell's assign/revert events pair up strictly. `Arc` events may name a
    /// filled `from` cell: the solver emits those inside doomed branches and
    /// replay ignores them.
    pub fn from_events(board: &Board, events: Vec<Event>) -> Result<Self, TraceError> {
        let variables: BTreeSet<Position> = board.empty_positions().into_iter().collect();
        let mut assigned: BTreeMap<Position, u8> = BTreeMap::new();

        for (index, event) in events.iter().enumerate() {
            match *event {
                Event::Arc { from, to, value } => {
                    check_position(index, from)?;
                    check_position(index, to)?;
                    check_value(index, value)?;
                }
                Event::ArcInferred { cell, value } => {
                    check_position(index, cell)?;
                    check_value(index, value)?;
                    check_variable(index, cell, &variables)?;
                }
                Event::BacktrackAssign { cell, value } => {
                    check_position(index, cell)?;
                    check_value(index, value)?;
                    check_variable(index, cell, &variables)?;
                    if assigned.insert(cell, value).is_some() {
                        return Err(TraceError::DoubleAssign { index, cell });
                    }
                }
                Event::BacktrackRevert { cell, value, .. } => {
                    check_position(index, cell)?;
                    check_value(index, value)?;
                    check_variable(index, cell, &variables)?;
                    match assigned.remove(&cell) {
                        None => return Err(TraceError::RevertWithoutAssign { index, cell }),
                        Some(v) if v != value => {
                            return Err(TraceError::RevertValueMismatch {
                                index,
                                cell,
                                assigned: v,
                                reverted: value,
                            })
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        Ok(Self { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }
}

fn check_position(index: usize, pos: Position) -> Result<(), TraceError> {
    if pos.in_range() {
        Ok(())
    } else {
        Err(TraceError::PositionOutOfRange {
            index,
            row: pos.row,
            col: pos.col,
        })
    }
}

fn check_value(index: usize, value: u8) -> Result<(), TraceError> {
    if (1..=9).contains(&value) {
        Ok(())
    } else {
        Err(TraceError::ValueOutOfRange { index, value })
    }
}

fn check_variable(
    index: usize,
    cell: Position,
    variables: &BTreeSet<Position>,
) -> Result<(), TraceError> {
    if variables.contains(&cell) {
        Ok(())
    } else {
        Err(TraceError::NotAVariable { index, cell })
    }
}

/// Outcome of one solve request, in the shape the replay viewer consumes.
///
/// `steps` is empty and `solution` is `None` when the board is unsolvable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    pub solvable: bool,
    pub steps: Vec<Event>,
    pub solution: Option<Board>,
    pub num_steps: usize,
    pub time_taken_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_board() -> Board {
        Board::empty()
    }

    #[test]
    fn test_event_wire_format() {
        let event = Event::Arc {
            from: Position::new(0, 2),
            to: Position::new(0, 0),
            value: 5,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"arc","from":[0,2],"to":[0,0],"value":5}"#);

        let inferred: Event =
            serde_json::from_str(r#"{"type":"arc_inferred","cell":[1,1],"value":3}"#).unwrap();
        assert_eq!(
            inferred,
            Event::ArcInferred {
                cell: Position::new(1, 1),
                value: 3
            }
        );
    }

    #[test]
    fn test_revert_snapshot_is_optional_on_the_wire() {
        // Traces from older producers carry no domain_before field.
        let json = r#"{"type":"backtrack_revert","cell":[4,4],"value":7}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            Event::BacktrackRevert {
                cell: Position::new(4, 4),
                value: 7,
                domain_before: None,
            }
        );
        // And the field is omitted again on output when absent.
        assert_eq!(serde_json::to_string(&event).unwrap(), json);
    }

    #[test]
    fn test_trace_accepts_paired_assign_revert() {
        let cell = Position::new(2, 2);
        let trace = Trace::from_events(
            &open_board(),
            vec![
                Event::BacktrackAssign { cell, value: 4 },
                Event::BacktrackRevert {
                    cell,
                    value: 4,
                    domain_before: None,
                },
                Event::BacktrackAssign { cell, value: 5 },
            ],
        )
        .unwrap();
        assert_eq!(trace.len(), 3);
    }

    #[test]
    fn test_trace_rejects_double_assign() {
        let cell = Position::new(2, 2);
        let err = Trace::from_events(
            &open_board(),
            vec![
                Event::BacktrackAssign { cell, value: 4 },
                Event::BacktrackAssign { cell, value: 5 },
            ],
        )
        .unwrap_err();
        assert_eq!(err, TraceError::DoubleAssign { index: 1, cell });
    }

    #[test]
    fn test_trace_rejects_unpaired_revert() {
        let cell = Position::new(0, 0);
        let err = Trace::from_events(
            &open_board(),
            vec![Event::BacktrackRevert {
                cell,
                value: 1,
                domain_before: None,
            }],
        )
        .unwrap_err();
        assert_eq!(err, TraceError::RevertWithoutAssign { index: 0, cell });
    }

    #[test]
    fn test_trace_rejects_non_variable_inference() {
        let mut board = Board::empty();
        board.set(Position::new(3, 3), 9);
        let err = Trace::from_events(
            &board,
            vec![Event::ArcInferred {
                cell: Position::new(3, 3),
                value: 9,
            }],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TraceError::NotAVariable {
                index: 0,
                cell: Position::new(3, 3)
            }
        );
    }

    #[test]
    fn test_trace_rejects_out_of_range() {
        let err = Trace::from_events(
            &open_board(),
            vec![Event::ArcInferred {
                cell: Position::new(9, 0),
                value: 1,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, TraceError::PositionOutOfRange { index: 0, .. }));

        let err = Trace::from_events(
            &open_board(),
            vec![Event::ArcInferred {
                cell: Position::new(0, 0),
                value: 0,
            }],
        )
        .unwrap_err();
        assert_eq!(err, TraceError::ValueOutOfRange { index: 0, value: 0 });
    }

    #[test]
    fn test_arc_may_reference_filled_cells() {
        // Givens can lose pseudo-domain values inside doomed search branches;
        // those events are legal and ignored by replay.
        let mut board = Board::empty();
        board.set(Position::new(0, 0), 5);
        let trace = Trace::from_events(
            &board,
            vec![Event::Arc {
                from: Position::new(0, 0),
                to: Position::new(0, 1),
                value: 5,
            }],
        );
        assert!(trace.is_ok());
    }
}
