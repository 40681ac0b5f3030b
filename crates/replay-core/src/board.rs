//! Board and cell coordinates.
//!
//! A `Board` is the 9x9 grid of placed values (0 = empty) that a solve
//! starts from. Cells empty at trace-start are the tracked variables of the
//! replay engine; cells with a non-zero original value never appear in
//! derived state.

use crate::domain::DomainSet;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A grid cell coordinate, `row` and `col` in `0..9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether both coordinates fall inside the grid.
    pub fn in_range(&self) -> bool {
        self.row < 9 && self.col < 9
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// Positions travel as `[row, col]` arrays in the solver wire format.
impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.row, self.col).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (row, col) = <(usize, usize)>::deserialize(deserializer)?;
        Ok(Self { row, col })
    }
}

/// Errors constructing a board from external input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A cell held a value outside `0..=9`.
    ValueOutOfRange { pos: Position, value: u8 },
    /// A puzzle string was not exactly 81 characters.
    BadLength(usize),
    /// A puzzle string held a character other than `0`-`9` or `.`.
    BadCharacter(char),
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValueOutOfRange { pos, value } => {
                write!(f, "cell {} holds {}, expected 0-9", pos, value)
            }
            Self::BadLength(len) => write!(f, "puzzle string has {} characters, expected 81", len),
            Self::BadCharacter(c) => write!(f, "unexpected character {:?} in puzzle string", c),
        }
    }
}

impl std::error::Error for BoardError {}

/// The 9x9 grid of placed values, `0` meaning empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[[u8; 9]; 9]", into = "[[u8; 9]; 9]")]
pub struct Board {
    cells: [[u8; 9]; 9],
}

impl TryFrom<[[u8; 9]; 9]> for Board {
    type Error = BoardError;

    fn try_from(cells: [[u8; 9]; 9]) -> Result<Self, Self::Error> {
        for (row, row_cells) in cells.iter().enumerate() {
            for (col, &value) in row_cells.iter().enumerate() {
                if value > 9 {
                    return Err(BoardError::ValueOutOfRange {
                        pos: Position::new(row, col),
                        value,
                    });
                }
            }
        }
        Ok(Self { cells })
    }
}

impl From<Board> for [[u8; 9]; 9] {
    fn from(board: Board) -> Self {
        board.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// An all-empty board.
    pub fn empty() -> Self {
        Self { cells: [[0; 9]; 9] }
    }

    /// Parse an 81-character puzzle string; `0` or `.` marks an empty cell.
    pub fn from_string(s: &str) -> Result<Self, BoardError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 81 {
            return Err(BoardError::BadLength(chars.len()));
        }
        let mut cells = [[0u8; 9]; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i / 9][i % 9] = match c {
                '.' | '0' => 0,
                '1'..='9' => c as u8 - b'0',
                other => return Err(BoardError::BadCharacter(other)),
            };
        }
        Ok(Self { cells })
    }

    /// Compact 81-character form, `0` for empty cells.
    pub fn to_string_compact(&self) -> String {
        let mut s = String::with_capacity(81);
        for row in &self.cells {
            for &v in row {
                s.push((b'0' + v) as char);
            }
        }
        s
    }

    /// Raw cell value, `0` for empty.
    #[inline]
    pub fn get(&self, pos: Position) -> u8 {
        self.cells[pos.row][pos.col]
    }

    /// Placed value, `None` for empty.
    #[inline]
    pub fn value(&self, pos: Position) -> Option<u8> {
        match self.cells[pos.row][pos.col] {
            0 => None,
            v => Some(v),
        }
    }

    #[inline]
    pub fn set(&mut self, pos: Position, value: u8) {
        debug_assert!(value <= 9);
        self.cells[pos.row][pos.col] = value;
    }

    #[inline]
    pub fn is_empty_cell(&self, pos: Position) -> bool {
        self.cells[pos.row][pos.col] == 0
    }

    /// All empty positions in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        let mut out = Vec::new();
        for row in 0..9 {
            for col in 0..9 {
                if self.cells[row][col] == 0 {
                    out.push(Position::new(row, col));
                }
            }
        }
        out
    }

    /// Number of filled cells.
    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&v| v != 0)
            .count()
    }

    /// Whether placing `value` at `pos` conflicts with the cell's row,
    /// column, or box. The cell's own current value is not consulted.
    pub fn is_safe(&self, pos: Position, value: u8) -> bool {
        let Position { row, col } = pos;
        for x in 0..9 {
            if self.cells[row][x] == value || self.cells[x][col] == value {
                return false;
            }
        }
        let box_row = row - row % 3;
        let box_col = col - col % 3;
        for r in box_row..box_row + 3 {
            for c in box_col..box_col + 3 {
                if self.cells[r][c] == value {
                    return false;
                }
            }
        }
        true
    }

    /// Values that could legally go in an empty cell. Empty for filled cells.
    pub fn possible_values(&self, pos: Position) -> DomainSet {
        if !self.is_empty_cell(pos) {
            return DomainSet::empty();
        }
        let mut set = DomainSet::empty();
        for value in 1..=9 {
            if self.is_safe(pos, value) {
                set.insert(value);
            }
        }
        set
    }

    /// Whether no row, column, or box contains a duplicate non-zero value.
    pub fn is_valid(&self) -> bool {
        for i in 0..9 {
            let mut row_seen = DomainSet::empty();
            let mut col_seen = DomainSet::empty();
            for j in 0..9 {
                let rv = self.cells[i][j];
                if rv != 0 {
                    if row_seen.contains(rv) {
                        return false;
                    }
                    row_seen.insert(rv);
                }
                let cv = self.cells[j][i];
                if cv != 0 {
                    if col_seen.contains(cv) {
                        return false;
                    }
                    col_seen.insert(cv);
                }
            }
        }
        for box_row in (0..9).step_by(3) {
            for box_col in (0..9).step_by(3) {
                let mut seen = DomainSet::empty();
                for r in box_row..box_row + 3 {
                    for c in box_col..box_col + 3 {
                        let v = self.cells[r][c];
                        if v != 0 {
                            if seen.contains(v) {
                                return false;
                            }
                            seen.insert(v);
                        }
                    }
                }
            }
        }
        true
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, row_cells) in self.cells.iter().enumerate() {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for (col, &v) in row_cells.iter().enumerate() {
                if col > 0 && col % 3 == 0 {
                    write!(f, "| ")?;
                }
                if v == 0 {
                    write!(f, ". ")?;
                } else {
                    write!(f, "{} ", v)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_from_string_roundtrip() {
        let board = Board::from_string(PUZZLE).unwrap();
        assert_eq!(board.to_string_compact(), PUZZLE);
        assert_eq!(board.get(Position::new(0, 0)), 5);
        assert!(board.is_empty_cell(Position::new(0, 2)));
        assert_eq!(board.filled_count(), 30);
    }

    #[test]
    fn test_from_string_rejects_bad_input() {
        assert_eq!(Board::from_string("123").unwrap_err(), BoardError::BadLength(3));
        let bad = "x".repeat(81);
        assert_eq!(
            Board::from_string(&bad).unwrap_err(),
            BoardError::BadCharacter('x')
        );
    }

    #[test]
    fn test_is_safe() {
        let board = Board::from_string(PUZZLE).unwrap();
        let pos = Position::new(0, 2);
        // 5 is already in row 0 and 6 in the top-left box.
        assert!(!board.is_safe(pos, 5));
        assert!(!board.is_safe(pos, 6));
        assert!(board.is_safe(pos, 1));
    }

    #[test]
    fn test_possible_values() {
        let board = Board::from_string(PUZZLE).unwrap();
        let cands = board.possible_values(Position::new(0, 2));
        assert!(cands.contains(1));
        assert!(!cands.contains(5));
        // Filled cells have no candidates.
        assert!(board.possible_values(Position::new(0, 0)).is_empty());
    }

    #[test]
    fn test_is_valid_detects_duplicates() {
        let board = Board::from_string(PUZZLE).unwrap();
        assert!(board.is_valid());

        let mut dup_row = board;
        dup_row.set(Position::new(0, 8), 5); // second 5 in row 0
        assert!(!dup_row.is_valid());

        let mut dup_box = board;
        dup_box.set(Position::new(2, 0), 5); // second 5 in top-left box
        assert!(!dup_box.is_valid());
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let json = serde_json::to_string(&Board::from_string(PUZZLE).unwrap()).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string_compact(), PUZZLE);

        let bad = json.replacen('5', "12", 1);
        assert!(serde_json::from_str::<Board>(&bad).is_err());
    }

    #[test]
    fn test_position_serializes_as_pair() {
        let json = serde_json::to_string(&Position::new(3, 7)).unwrap();
        assert_eq!(json, "[3,7]");
        let back: Position = serde_json::from_str("[3,7]").unwrap();
        assert_eq!(back, Position::new(3, 7));
    }
}
