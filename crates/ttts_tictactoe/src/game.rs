//! Tic-tac-toe game state machine.

use super::invariants::{GameInvariants, InvariantSet};
use super::rules::{check_winner, is_full};
use super::{Board, Mark, Position};
use tracing::{debug, instrument};

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended with a completed line.
    Won(Mark),
    /// Board filled without a line.
    Tied,
}

impl GameStatus {
    /// Whether no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Error that can occur when validating a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The index does not name a square.
    #[display("Position {} is out of bounds (must be 0-8)", _0)]
    OutOfRange(i64),

    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}

/// Tic-tac-toe game engine.
///
/// X always moves first. The mover switches after every accepted move,
/// and a rejected move leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    to_move: Mark,
    status: GameStatus,
    history: Vec<Position>,
}

impl Game {
    /// Creates a new game with X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark whose turn it is.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the accepted positions in play order.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Plays a raw wire index for the current mover.
    #[instrument(skip(self))]
    pub fn play_index(&mut self, index: i64) -> Result<GameStatus, MoveError> {
        let pos = Position::from_wire(index).ok_or(MoveError::OutOfRange(index))?;
        self.play(pos)
    }

    /// Plays `pos` for the current mover and returns the resulting status.
    #[instrument(skip(self), fields(mover = %self.to_move))]
    pub fn play(&mut self, pos: Position) -> Result<GameStatus, MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let mover = self.to_move;
        self.board.place(pos, mover)?;
        self.history.push(pos);
        self.to_move = mover.opponent();

        if let Some(winner) = check_winner(&self.board) {
            self.status = GameStatus::Won(winner);
        } else if is_full(&self.board) {
            self.status = GameStatus::Tied;
        }

        debug_assert!(
            GameInvariants::check_all(self).is_ok(),
            "game invariants violated after {:?}",
            pos
        );
        debug!(position = pos.to_index(), status = ?self.status, "Move applied");

        Ok(self.status)
    }

    /// Replays moves from the initial state, stopping at the first error.
    #[instrument]
    pub fn replay(moves: &[Position]) -> Result<Self, MoveError> {
        let mut game = Self::new();
        for pos in moves {
            game.play(*pos)?;
        }
        Ok(game)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_move_keeps_state() {
        let mut game = Game::new();
        game.play(Position::Center).unwrap();
        let before = game.clone();

        assert_eq!(
            game.play(Position::Center),
            Err(MoveError::SquareOccupied(Position::Center))
        );
        assert_eq!(game.play_index(9), Err(MoveError::OutOfRange(9)));
        assert_eq!(game.play_index(-3), Err(MoveError::OutOfRange(-3)));
        assert_eq!(game, before);
        assert_eq!(game.to_move(), Mark::O);
    }

    #[test]
    fn test_no_moves_after_win() {
        let mut game = Game::replay(&[
            Position::TopLeft,
            Position::MiddleLeft,
            Position::TopCenter,
            Position::Center,
            Position::TopRight,
        ])
        .unwrap();
        assert_eq!(game.status(), GameStatus::Won(Mark::X));
        assert_eq!(game.play(Position::BottomRight), Err(MoveError::GameOver));
        assert_eq!(game.board().occupied(), 5);
    }
}
