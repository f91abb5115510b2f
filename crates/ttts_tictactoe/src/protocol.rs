//! Line protocol spoken with each participant.
//!
//! One message per line. The server sends [`ServerMessage`]s and reads
//! [`ClientCommand`]s; both directions encode with `Display` and decode with
//! `FromStr`, so a client can reuse this module. Decoding never panics:
//! malformed input comes back as a [`ProtocolViolation`].

use super::{Mark, Position};
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

const WELCOME: &str = "WELCOME";
const MESSAGE: &str = "MESSAGE: ";
const MOVE: &str = "MOVE";
const VICTORY: &str = "VICTORY";
const DEFEAT: &str = "DEFEAT";
const TIE: &str = "TIE";

const WAITING: &str = "Waiting for opponent to connect";
const YOUR_MOVE: &str = "Your move (Enter 'MOVE [0-8]')";
const VALID_MOVE: &str = "Valid Move!";
const OPPONENT_MOVED: &str = "Opponent Moved: ";
const INVALID_MOVE: &str = "Invalid move. Please enter a valid location[0-8].";
const INVALID_COMMAND: &str = "Unrecognized command. Please enter 'MOVE [0-8]'.";
const NOT_YOUR_TURN: &str = "Not your turn";
const OPPONENT_DISCONNECTED: &str = "Opponent disconnected";
const MOVE_TIMED_OUT: &str = "Move timed out";
const OPPONENT_TIMED_OUT: &str = "Opponent timed out";

/// Input that does not follow the protocol.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ProtocolViolation {
    /// The line does not start with a known verb.
    #[display("Unknown command: {:?}", _0)]
    UnknownCommand(String),

    /// `MOVE` without an index.
    #[display("Missing move index")]
    MissingArgument,

    /// The index is not a decimal integer.
    #[display("Move index is not an integer: {:?}", _0)]
    InvalidArgument(String),

    /// A server line that is not part of the vocabulary.
    #[display("Unknown server message: {:?}", _0)]
    UnknownMessage(String),
}

impl std::error::Error for ProtocolViolation {}

/// Command sent by a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ClientCommand {
    /// Claim the square at the given wire index. Range is not checked here.
    #[display("MOVE {}", _0)]
    Move(i64),
}

impl ClientCommand {
    /// Parses one input line.
    #[instrument]
    pub fn parse(line: &str) -> Result<Self, ProtocolViolation> {
        let line = line.trim();
        let (verb, arg) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));

        if verb != MOVE {
            return Err(ProtocolViolation::UnknownCommand(verb.to_string()));
        }

        let arg = arg.trim();
        if arg.is_empty() {
            return Err(ProtocolViolation::MissingArgument);
        }

        arg.parse::<i64>()
            .map(ClientCommand::Move)
            .map_err(|_| ProtocolViolation::InvalidArgument(arg.to_string()))
    }
}

impl FromStr for ClientCommand {
    type Err = ProtocolViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Message sent by the server to one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Identity assignment.
    Welcome(Mark),
    /// Sent to X during the handshake.
    WaitingForOpponent,
    /// Prompt for the current mover.
    YourMove,
    /// The mover's move was accepted.
    ValidMove,
    /// The opponent's move was accepted.
    OpponentMoved(Position),
    /// Index out of range or square occupied.
    InvalidMove,
    /// Line is not a well-formed `MOVE <n>`.
    InvalidCommand,
    /// Input arrived from the idle participant.
    NotYourTurn,
    /// The other participant's stream closed.
    OpponentDisconnected,
    /// The recipient did not move before the deadline.
    MoveTimedOut,
    /// The opponent did not move before the deadline.
    OpponentTimedOut,
    /// Free-form informational notice.
    Notice(String),
    /// The recipient completed a line.
    Victory,
    /// The opponent completed a line.
    Defeat,
    /// Board full without a line.
    Tie,
}

impl ServerMessage {
    /// Whether this message ends the match for its recipient.
    ///
    /// The server closes the connection after any of these.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ServerMessage::Victory
                | ServerMessage::Defeat
                | ServerMessage::Tie
                | ServerMessage::OpponentDisconnected
                | ServerMessage::MoveTimedOut
                | ServerMessage::OpponentTimedOut
        )
    }

    fn notice_text(&self) -> Option<&str> {
        let text = match self {
            ServerMessage::WaitingForOpponent => WAITING,
            ServerMessage::YourMove => YOUR_MOVE,
            ServerMessage::ValidMove => VALID_MOVE,
            ServerMessage::InvalidMove => INVALID_MOVE,
            ServerMessage::InvalidCommand => INVALID_COMMAND,
            ServerMessage::NotYourTurn => NOT_YOUR_TURN,
            ServerMessage::OpponentDisconnected => OPPONENT_DISCONNECTED,
            ServerMessage::MoveTimedOut => MOVE_TIMED_OUT,
            ServerMessage::OpponentTimedOut => OPPONENT_TIMED_OUT,
            ServerMessage::Notice(text) => text,
            _ => return None,
        };
        Some(text)
    }

    fn from_notice(text: &str) -> Self {
        const FIXED: [ServerMessage; 9] = [
            ServerMessage::WaitingForOpponent,
            ServerMessage::YourMove,
            ServerMessage::ValidMove,
            ServerMessage::InvalidMove,
            ServerMessage::InvalidCommand,
            ServerMessage::NotYourTurn,
            ServerMessage::OpponentDisconnected,
            ServerMessage::MoveTimedOut,
            ServerMessage::OpponentTimedOut,
        ];

        if let Some(known) = FIXED.iter().find(|m| m.notice_text() == Some(text)) {
            return known.clone();
        }

        text.strip_prefix(OPPONENT_MOVED)
            .and_then(|index| index.trim().parse::<usize>().ok())
            .and_then(Position::from_index)
            .map(ServerMessage::OpponentMoved)
            .unwrap_or_else(|| ServerMessage::Notice(text.to_string()))
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Welcome(mark) => write!(f, "{WELCOME} {mark}"),
            ServerMessage::OpponentMoved(pos) => {
                write!(f, "{MESSAGE}{OPPONENT_MOVED}{}", pos.to_index())
            }
            ServerMessage::Victory => f.write_str(VICTORY),
            ServerMessage::Defeat => f.write_str(DEFEAT),
            ServerMessage::Tie => f.write_str(TIE),
            other => match other.notice_text() {
                Some(text) => write!(f, "{MESSAGE}{text}"),
                None => Err(fmt::Error),
            },
        }
    }
}

impl FromStr for ServerMessage {
    type Err = ProtocolViolation;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(text) = line.strip_prefix(MESSAGE) {
            return Ok(Self::from_notice(text));
        }

        match line {
            VICTORY => return Ok(ServerMessage::Victory),
            DEFEAT => return Ok(ServerMessage::Defeat),
            TIE => return Ok(ServerMessage::Tie),
            _ => {}
        }

        line.strip_prefix(WELCOME)
            .and_then(|rest| rest.strip_prefix(' '))
            .and_then(Mark::from_symbol)
            .map(ServerMessage::Welcome)
            .ok_or_else(|| ProtocolViolation::UnknownMessage(line.to_string()))
    }
}
