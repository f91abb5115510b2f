//! Tests for the tic-tac-toe state machine.

use ttts_tictactoe::rules::LINES;
use ttts_tictactoe::{Game, GameStatus, Mark, MoveError, Position, Square};

fn pos(index: usize) -> Position {
    Position::from_index(index).expect("index in range")
}

fn play_all(indices: &[usize]) -> Game {
    let mut game = Game::new();
    for &i in indices {
        game.play(pos(i)).expect("legal move");
    }
    game
}

#[test]
fn test_top_row_win_scenario() {
    let game = play_all(&[0, 3, 1, 4, 2]);
    assert_eq!(game.status(), GameStatus::Won(Mark::X));
    assert_eq!(game.board().occupied(), 5);
}

#[test]
fn test_index_order_sequence_wins_on_anti_diagonal() {
    // X holds 0, 2, 4, 6 after seven plies: the 2-4-6 diagonal is complete.
    let mut game = Game::new();
    for i in 0..6 {
        assert_eq!(game.play(pos(i)), Ok(GameStatus::InProgress));
    }
    assert_eq!(game.play(pos(6)), Ok(GameStatus::Won(Mark::X)));
    assert_eq!(game.play(pos(7)), Err(MoveError::GameOver));
}

#[test]
fn test_full_board_without_line_ties() {
    let game = play_all(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
    assert_eq!(game.status(), GameStatus::Tied);
    assert_eq!(game.board().occupied(), 9);
}

#[test]
fn test_win_on_last_square_is_not_tie() {
    // X completes the 0-4-8 diagonal with the ninth ply.
    let game = play_all(&[0, 1, 2, 3, 4, 5, 7, 6, 8]);
    assert_eq!(game.board().occupied(), 9);
    assert_eq!(game.status(), GameStatus::Won(Mark::X));
}

#[test]
fn test_each_line_wins_for_o() {
    for line in LINES {
        let mut game = Game::new();
        let mut x_cells = Position::valid_moves(game.board())
            .into_iter()
            .filter(|p| !line.contains(p));
        let mut status = GameStatus::InProgress;
        for target in line {
            // X plays somewhere harmless, then O claims the next cell of the line.
            let filler = loop {
                let candidate = x_cells.next().expect("free filler cell");
                let mut probe = game.clone();
                if probe.play(candidate) == Ok(GameStatus::InProgress) {
                    break candidate;
                }
            };
            game.play(filler).unwrap();
            status = game.play(target).unwrap();
        }
        assert_eq!(status, GameStatus::Won(Mark::O), "line {line:?}");
        for target in line {
            assert_eq!(game.board().get(target), Square::Occupied(Mark::O));
        }
    }
}

#[test]
fn test_occupied_square_does_not_advance_turn() {
    let mut game = play_all(&[4]);
    assert_eq!(game.to_move(), Mark::O);
    assert_eq!(game.play(pos(4)), Err(MoveError::SquareOccupied(Position::Center)));
    assert_eq!(game.to_move(), Mark::O);
    assert_eq!(game.play(pos(0)), Ok(GameStatus::InProgress));
    assert_eq!(game.to_move(), Mark::X);
}

#[test]
fn test_out_of_range_rejected_like_occupied() {
    let mut game = Game::new();
    for index in [-1, 9, 100, i64::MIN] {
        assert_eq!(game.play_index(index), Err(MoveError::OutOfRange(index)));
    }
    assert_eq!(game.to_move(), Mark::X);
    assert!(game.history().is_empty());
}

#[test]
fn test_turns_alternate_every_accepted_move() {
    let mut game = Game::new();
    let mut expected = Mark::X;
    for i in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
        assert_eq!(game.to_move(), expected);
        game.play(pos(i)).unwrap();
        expected = expected.opponent();
    }
    assert_eq!(game.history().len(), 9);
}

#[test]
fn test_replay_matches_incremental_play() {
    let moves: Vec<Position> = [4, 0, 8, 2].into_iter().map(pos).collect();
    let replayed = Game::replay(&moves).unwrap();
    assert_eq!(replayed, play_all(&[4, 0, 8, 2]));
    assert_eq!(replayed.history(), moves.as_slice());
}
