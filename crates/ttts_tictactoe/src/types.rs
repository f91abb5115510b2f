//! Core domain types for tic-tac-toe.

use super::game::MoveError;
use super::position::Position;

/// Mark identifying a participant's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O (moves second).
    O,
}

impl Mark {
    /// Both marks in turn order.
    pub const BOTH: [Mark; 2] = [Mark::X, Mark::O];

    /// Returns the opponent's mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Slot of this mark in a two-element arena (X = 0, O = 1).
    pub fn index(self) -> usize {
        match self {
            Mark::X => 0,
            Mark::O => 1,
        }
    }

    /// Parses the wire symbol of a mark.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "X" => Some(Mark::X),
            "O" => Some(Mark::O),
            _ => None,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square claimed by a mark.
    Occupied(Mark),
}

/// 3x3 tic-tac-toe board.
///
/// Squares only ever go from empty to occupied: [`Board::place`] is the
/// single mutator and refuses occupied squares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Claims an empty square for `mark`.
    pub fn place(&mut self, pos: Position, mark: Mark) -> Result<(), MoveError> {
        let square = &mut self.squares[pos.to_index()];
        if *square != Square::Empty {
            return Err(MoveError::SquareOccupied(pos));
        }
        *square = Square::Occupied(mark);
        Ok(())
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Formats the board as a human-readable grid, empty squares showing their index.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => pos.to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_refuses_occupied_square() {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X).unwrap();
        let result = board.place(Position::Center, Mark::O);
        assert_eq!(result, Err(MoveError::SquareOccupied(Position::Center)));
        assert_eq!(board.get(Position::Center), Square::Occupied(Mark::X));
    }

    #[test]
    fn test_display_shows_indices_and_marks() {
        let mut board = Board::new();
        board.place(Position::TopLeft, Mark::X).unwrap();
        board.place(Position::BottomRight, Mark::O).unwrap();
        assert_eq!(board.display(), "X|1|2\n-+-+-\n3|4|5\n-+-+-\n6|7|O");
    }

    #[test]
    fn test_opponent_and_index() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
        assert_eq!(Mark::X.index(), 0);
        assert_eq!(Mark::O.index(), 1);
    }
}
