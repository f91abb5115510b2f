//! Error types for matches and configuration.

use derive_more::{Display, Error};
use tracing::instrument;
use ttts_tictactoe::Mark;

/// Why a match ended without an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MatchErrorKind {
    /// A stream could not be used during the handshake; no match was started.
    #[display("Connection to player {} failed during handshake: {}", mark, reason)]
    Connection {
        /// Participant whose stream failed.
        mark: Mark,
        /// Underlying I/O failure.
        reason: String,
    },

    /// A participant's stream closed or failed mid-match.
    #[display("Player {} disconnected", _0)]
    PeerDisconnected(Mark),

    /// The current mover did not make a legal move before the deadline.
    #[display("Player {} did not move in time", _0)]
    MoveTimeout(Mark),

    /// A participant sent a line longer than the configured maximum.
    #[display("Player {} sent an oversized line", _0)]
    LineTooLong(Mark),
}

/// Fatal match error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Match error: {} at {}:{}", kind, file, line)]
pub struct MatchError {
    /// What went wrong.
    pub kind: MatchErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl MatchError {
    /// Creates a new match error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: MatchErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The participant the failure is attributed to.
    pub fn mark(&self) -> Mark {
        match &self.kind {
            MatchErrorKind::Connection { mark, .. } => *mark,
            MatchErrorKind::PeerDisconnected(mark)
            | MatchErrorKind::MoveTimeout(mark)
            | MatchErrorKind::LineTooLong(mark) => *mark,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
