//! Alternating turn invariant: X, O, X, O, ...

use super::Invariant;
use crate::{Game, Mark};

/// Invariant: the mover is X after an even number of plies and O after an odd one.
pub struct AlternatingTurnInvariant;

impl Invariant<Game> for AlternatingTurnInvariant {
    fn holds(game: &Game) -> bool {
        let expected = if game.history().len() % 2 == 0 {
            Mark::X
        } else {
            Mark::O
        };
        game.to_move() == expected
    }

    fn description() -> &'static str {
        "Players alternate turns (X, O, X, O, ...)"
    }
}
