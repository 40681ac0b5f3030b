//! Plain backtracking search, without trace recording.
//!
//! Used for solvability checks, solution counting with a cutoff, and random
//! board filling during generation. The `(start_row, start_col)` arguments
//! let recursion resume its empty-cell scan where the parent left off
//! instead of rescanning from the origin.

use crate::board::{Board, Position};
use rand::seq::SliceRandom;
use rand::Rng;

/// First empty cell at or after `(start_row, start_col)` in row-major order.
fn find_empty_from(board: &Board, start_row: usize, start_col: usize) -> Option<Position> {
    for col in start_col..9 {
        let pos = Position::new(start_row, col);
        if board.is_empty_cell(pos) {
            return Some(pos);
        }
    }
    for row in start_row + 1..9 {
        for col in 0..9 {
            let pos = Position::new(row, col);
            if board.is_empty_cell(pos) {
                return Some(pos);
            }
        }
    }
    None
}

fn solvable_from(board: &mut Board, start_row: usize, start_col: usize) -> bool {
    let Some(pos) = find_empty_from(board, start_row, start_col) else {
        return true;
    };
    for value in board.possible_values(pos).iter() {
        board.set(pos, value);
        if solvable_from(board, pos.row, pos.col) {
            return true;
        }
        board.set(pos, 0);
    }
    false
}

/// Whether the board admits at least one solution.
pub fn is_solvable(board: &Board) -> bool {
    let mut working = *board;
    solvable_from(&mut working, 0, 0)
}

fn solution_from(board: &mut Board, start_row: usize, start_col: usize) -> Option<Board> {
    let Some(pos) = find_empty_from(board, start_row, start_col) else {
        return Some(*board);
    };
    for value in 1..=9 {
        if board.is_safe(pos, value) {
            board.set(pos, value);
            if let Some(solved) = solution_from(board, pos.row, pos.col) {
                return Some(solved);
            }
            board.set(pos, 0);
        }
    }
    None
}

/// The first solution found in value order, if any.
pub fn first_solution(board: &Board) -> Option<Board> {
    let mut working = *board;
    solution_from(&mut working, 0, 0)
}

fn count_from(
    board: &mut Board,
    start_row: usize,
    start_col: usize,
    limit: usize,
) -> usize {
    let Some(pos) = find_empty_from(board, start_row, start_col) else {
        return 1;
    };
    let mut count = 0;
    for value in 1..=9 {
        if board.is_safe(pos, value) {
            board.set(pos, value);
            count += count_from(board, pos.row, pos.col, limit);
            board.set(pos, 0);
            if count >= limit {
                return count;
            }
        }
    }
    count
}

/// Number of solutions, stopping once `limit` is reached.
pub fn count_solutions(board: &Board, limit: usize) -> usize {
    let mut working = *board;
    count_from(&mut working, 0, 0, limit)
}

/// Fill every empty cell with a random valid assignment. Returns false only
/// if the board cannot be completed.
pub(crate) fn fill_random<R: Rng>(board: &mut Board, rng: &mut R) -> bool {
    let Some(pos) = find_empty_from(board, 0, 0) else {
        return true;
    };
    let mut candidates: Vec<u8> = (1..=9).collect();
    candidates.shuffle(rng);
    for value in candidates {
        if board.is_safe(pos, value) {
            board.set(pos, value);
            if fill_random(board, rng) {
                return true;
            }
            board.set(pos, 0);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    #[test]
    fn test_solves_known_puzzle() {
        let board = Board::from_string(PUZZLE).unwrap();
        assert!(is_solvable(&board));
        let solved = first_solution(&board).unwrap();
        assert_eq!(solved.to_string_compact(), SOLUTION);
    }

    #[test]
    fn test_unsolvable_board() {
        // Row 0 pins 1-8 and column 8 already holds the 9, so cell (0,8)
        // has no legal value even though the board contains no duplicates.
        let mut board = Board::empty();
        for (col, v) in [1u8, 2, 3, 4, 5, 6, 7, 8].iter().enumerate() {
            board.set(Position::new(0, col), *v);
        }
        board.set(Position::new(5, 8), 9);
        assert!(board.is_valid());
        assert!(!is_solvable(&board));
    }

    #[test]
    fn test_count_solutions_cutoff() {
        let board = Board::from_string(PUZZLE).unwrap();
        assert_eq!(count_solutions(&board, 2), 1);

        // An empty board has a huge number of completions; the cutoff stops
        // the search immediately.
        assert_eq!(count_solutions(&Board::empty(), 2), 2);
    }

    #[test]
    fn test_fill_random_produces_valid_complete_board() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut board = Board::empty();
        assert!(fill_random(&mut board, &mut rng));
        assert_eq!(board.filled_count(), 81);
        assert!(board.is_valid());
    }
}
