//! Pure tic-tac-toe game logic and the line protocol used to play it.
//!
//! # Architecture
//!
//! - **Types**: marks, squares and the board
//! - **Rules**: win and draw detection over a fixed table of lines
//! - **Game**: the move-by-move state machine
//! - **Invariants**: properties asserted after every move in debug builds
//! - **Protocol**: the stateless line codec shared by server and client
//!
//! # Example
//!
//! ```
//! use ttts_tictactoe::{ClientCommand, Game, GameStatus, Mark};
//!
//! let mut game = Game::new();
//! let ClientCommand::Move(index) = ClientCommand::parse("MOVE 4").unwrap();
//! assert_eq!(game.play_index(index), Ok(GameStatus::InProgress));
//! assert_eq!(game.to_move(), Mark::O);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod game;
pub mod invariants;
mod position;
mod protocol;
pub mod rules;
mod types;

pub use game::{Game, GameStatus, MoveError};
pub use position::Position;
pub use protocol::{ClientCommand, ProtocolViolation, ServerMessage};
pub use types::{Board, Mark, Square};
