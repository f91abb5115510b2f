//! Match engine: one game between two connected participants.
//!
//! The match moves through three phases, each its own type:
//!
//! - [`MatchSetup`]: both streams known, nothing sent yet
//! - [`MatchInProgress`]: handshake done, turn loop ready to run
//! - [`MatchFinished`]: a line was completed or the board filled
//!
//! The turn loop is a single sequential flow. While it waits on the current
//! mover it also watches the idle participant, so out-of-turn input is
//! answered and a disconnect is noticed without waiting for that
//! participant's turn.

use crate::config::ServerConfig;
use crate::error::{MatchError, MatchErrorKind};
use crate::participant::{Inbound, Participant};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use ttts_tictactoe::{
    Board, ClientCommand, Game, GameStatus, Mark, MoveError, Position, ServerMessage,
};

/// How a completed match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MatchOutcome {
    /// The mark completed a line.
    #[display("{} won", _0)]
    Won(Mark),
    /// The board filled without a line.
    #[display("tie")]
    Tied,
}

// ─────────────────────────────────────────────────────────────
//  Setup Phase
// ─────────────────────────────────────────────────────────────

/// A match whose two streams are known but untouched.
///
/// The first stream plays X, the second O.
#[derive(Debug)]
pub struct MatchSetup<S> {
    streams: [S; 2],
    max_line_length: usize,
    move_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl<S> MatchSetup<S>
where
    S: AsyncRead + AsyncWrite,
{
    /// Pairs two streams into a match. Performs no I/O.
    #[instrument(skip(stream_x, stream_o))]
    pub fn new(stream_x: S, stream_o: S, config: &ServerConfig) -> Self {
        Self {
            streams: [stream_x, stream_o],
            max_line_length: *config.max_line_length(),
            move_timeout: config.move_timeout(),
            write_timeout: config.write_timeout(),
        }
    }

    /// Opens both participants and greets them. X is told to wait and moves first.
    ///
    /// Any write failure here is a [`MatchErrorKind::Connection`] and no
    /// match is started.
    #[instrument(skip(self))]
    pub async fn handshake(self) -> Result<MatchInProgress<S>, MatchError> {
        let [x, o] = self.streams;
        let mut participants = [
            Participant::open(x, Mark::X, self.max_line_length, self.write_timeout),
            Participant::open(o, Mark::O, self.max_line_length, self.write_timeout),
        ];

        for participant in &mut participants {
            let mark = participant.mark();
            let mut greeting = Vec::with_capacity(2);
            if mark == Mark::X {
                greeting.push(ServerMessage::WaitingForOpponent);
            }
            greeting.push(ServerMessage::Welcome(mark));

            for message in &greeting {
                participant.send(message).await.map_err(|e| {
                    warn!(%mark, error = %e, "Handshake failed");
                    MatchError::new(MatchErrorKind::Connection {
                        mark,
                        reason: e.to_string(),
                    })
                })?;
            }
        }

        info!("Handshake complete, X to move");
        Ok(MatchInProgress {
            participants,
            game: Game::new(),
            move_timeout: self.move_timeout,
        })
    }
}

// ─────────────────────────────────────────────────────────────
//  InProgress Phase
// ─────────────────────────────────────────────────────────────

/// A match accepting moves.
///
/// Participants live in a two-slot arena indexed by [`Mark::index`]; the
/// opponent of a participant is the other slot.
#[derive(Debug)]
pub struct MatchInProgress<S> {
    participants: [Participant<S>; 2],
    game: Game,
    move_timeout: Option<Duration>,
}

impl<S> MatchInProgress<S>
where
    S: AsyncRead + AsyncWrite,
{
    /// The game as played so far.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Runs the turn loop to a terminal state, then closes both streams.
    ///
    /// On a fatal error the surviving participant is told why, best-effort.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> Result<MatchFinished, MatchError> {
        let result = self.play().await;

        if let Err(error) = &result {
            warn!(%error, "Match aborted");
            self.notify_failure(error).await;
        }

        for participant in &mut self.participants {
            participant.close().await;
        }

        let outcome = result?;
        info!(%outcome, moves = self.game.history().len(), "Match finished");
        Ok(MatchFinished {
            outcome,
            game: self.game,
        })
    }

    async fn play(&mut self) -> Result<MatchOutcome, MatchError> {
        loop {
            match self.take_turn().await? {
                GameStatus::InProgress => continue,
                GameStatus::Won(winner) => {
                    self.notify(winner, &ServerMessage::Victory).await;
                    self.notify(winner.opponent(), &ServerMessage::Defeat).await;
                    return Ok(MatchOutcome::Won(winner));
                }
                GameStatus::Tied => {
                    for mark in Mark::BOTH {
                        self.notify(mark, &ServerMessage::Tie).await;
                    }
                    return Ok(MatchOutcome::Tied);
                }
            }
        }
    }

    /// Prompts the current mover and reads until a legal move is applied.
    #[instrument(skip(self), fields(mover = %self.game.to_move()))]
    async fn take_turn(&mut self) -> Result<GameStatus, MatchError> {
        let mover = self.game.to_move();
        let deadline = self.move_timeout.map(|timeout| Instant::now() + timeout);
        self.send(mover, &ServerMessage::YourMove).await?;

        loop {
            let (from, inbound) = self.next_inbound(mover, deadline).await?;
            let line = match inbound {
                Inbound::Line(line) => line,
                Inbound::Closed => {
                    info!(mark = %from, "Participant closed the connection");
                    return Err(MatchError::new(MatchErrorKind::PeerDisconnected(from)));
                }
                Inbound::Failed(error) => {
                    warn!(mark = %from, %error, "Participant stream failed");
                    return Err(MatchError::new(MatchErrorKind::PeerDisconnected(from)));
                }
                Inbound::TooLong => {
                    return Err(MatchError::new(MatchErrorKind::LineTooLong(from)));
                }
            };

            if from != mover {
                debug!(mark = %from, %line, "Input out of turn");
                self.send(from, &ServerMessage::NotYourTurn).await?;
                continue;
            }

            let index = match ClientCommand::parse(&line) {
                Ok(ClientCommand::Move(index)) => index,
                Err(violation) => {
                    debug!(%violation, "Protocol violation");
                    self.send(mover, &ServerMessage::InvalidCommand).await?;
                    continue;
                }
            };

            let accepted = Position::from_wire(index)
                .ok_or(MoveError::OutOfRange(index))
                .and_then(|pos| self.game.play(pos).map(|status| (pos, status)));

            match accepted {
                Ok((pos, status)) => {
                    info!(position = pos.to_index(), "Move accepted");
                    self.send(mover, &ServerMessage::ValidMove).await?;
                    self.send(mover.opponent(), &ServerMessage::OpponentMoved(pos))
                        .await?;
                    return Ok(status);
                }
                Err(error) => {
                    debug!(%error, "Illegal move");
                    self.send(mover, &ServerMessage::InvalidMove).await?;
                }
            }
        }
    }

    /// Waits for input from either participant, bounded by `deadline`.
    async fn next_inbound(
        &mut self,
        mover: Mark,
        deadline: Option<Instant>,
    ) -> Result<(Mark, Inbound), MatchError> {
        let idle_mark = mover.opponent();
        let [x, o] = &mut self.participants;
        let (active, idle) = match mover {
            Mark::X => (x, o),
            Mark::O => (o, x),
        };

        let read = async {
            tokio::select! {
                inbound = active.recv() => (mover, inbound),
                inbound = idle.recv() => (idle_mark, inbound),
            }
        };

        match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, read).await.map_err(|_| {
                info!(%mover, "Move deadline passed");
                MatchError::new(MatchErrorKind::MoveTimeout(mover))
            }),
            None => Ok(read.await),
        }
    }

    fn participant(&mut self, mark: Mark) -> &mut Participant<S> {
        &mut self.participants[mark.index()]
    }

    /// Sends to `mark`; a failed or timed-out write means that participant is gone.
    async fn send(&mut self, mark: Mark, message: &ServerMessage) -> Result<(), MatchError> {
        self.participant(mark).send(message).await.map_err(|error| {
            debug!(%mark, %error, "Write failed");
            MatchError::new(MatchErrorKind::PeerDisconnected(mark))
        })
    }

    /// Sends to `mark`, logging instead of failing.
    async fn notify(&mut self, mark: Mark, message: &ServerMessage) {
        if let Err(error) = self.participant(mark).send(message).await {
            debug!(%mark, %error, %message, "Notification not delivered");
        }
    }

    async fn notify_failure(&mut self, error: &MatchError) {
        match &error.kind {
            MatchErrorKind::PeerDisconnected(mark) | MatchErrorKind::LineTooLong(mark) => {
                self.notify(mark.opponent(), &ServerMessage::OpponentDisconnected)
                    .await;
            }
            MatchErrorKind::MoveTimeout(mark) => {
                self.notify(*mark, &ServerMessage::MoveTimedOut).await;
                self.notify(mark.opponent(), &ServerMessage::OpponentTimedOut)
                    .await;
            }
            MatchErrorKind::Connection { .. } => {}
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Finished Phase
// ─────────────────────────────────────────────────────────────

/// A match that reached a terminal state.
#[derive(Debug, Clone)]
pub struct MatchFinished {
    outcome: MatchOutcome,
    game: Game,
}

impl MatchFinished {
    /// How the match ended.
    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    /// The final board.
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    /// Accepted positions in play order.
    pub fn history(&self) -> &[Position] {
        self.game.history()
    }
}

/// Runs a whole match: construct, handshake, turn loop.
#[instrument(skip_all)]
pub async fn run_match<S>(
    stream_x: S,
    stream_o: S,
    config: &ServerConfig,
) -> Result<MatchFinished, MatchError>
where
    S: AsyncRead + AsyncWrite,
{
    MatchSetup::new(stream_x, stream_o, config)
        .handshake()
        .await?
        .run()
        .await
}
