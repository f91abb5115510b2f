//! History consistency invariant: the board is exactly the replay of the history.

use super::Invariant;
use crate::{Game, Mark, Square};

/// Invariant: ply `i` of the history holds X when `i` is even and O when odd,
/// and no other square is occupied.
///
/// Together with the append-only history this means a square never reverts
/// or changes owner.
pub struct HistoryConsistentInvariant;

impl Invariant<Game> for HistoryConsistentInvariant {
    fn holds(game: &Game) -> bool {
        let board = game.board();
        let placed = game.history().iter().enumerate().all(|(ply, pos)| {
            let mark = if ply % 2 == 0 { Mark::X } else { Mark::O };
            board.get(*pos) == Square::Occupied(mark)
        });
        placed && board.occupied() == game.history().len()
    }

    fn description() -> &'static str {
        "Board matches the replay of the move history"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_holds_for_replayed_game() {
        let game = Game::replay(&[Position::Center, Position::TopLeft, Position::BottomRight])
            .unwrap();
        assert!(HistoryConsistentInvariant::holds(&game));
    }
}
