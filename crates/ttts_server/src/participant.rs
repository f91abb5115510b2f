//! One connected peer of a match.

use futures::{SinkExt, StreamExt};
use std::io::{self, ErrorKind};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, instrument, trace};
use ttts_tictactoe::{Mark, ServerMessage};

/// What a participant's input stream produced.
#[derive(Debug)]
pub enum Inbound {
    /// A complete line (without its terminator).
    Line(String),
    /// The peer closed its side of the stream.
    Closed,
    /// The peer exceeded the maximum line length.
    TooLong,
    /// The stream failed.
    Failed(io::Error),
}

impl From<Option<Result<String, LinesCodecError>>> for Inbound {
    fn from(next: Option<Result<String, LinesCodecError>>) -> Self {
        match next {
            Some(Ok(line)) => Inbound::Line(line),
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => Inbound::TooLong,
            Some(Err(LinesCodecError::Io(e))) => Inbound::Failed(e),
            None => Inbound::Closed,
        }
    }
}

/// A participant after the handshake opened its line reader and writer.
///
/// The opponent is not stored here: participants live in a two-slot arena
/// indexed by [`Mark::index`], and the opponent is the other slot.
#[derive(Debug)]
pub struct Participant<S> {
    mark: Mark,
    reader: FramedRead<ReadHalf<S>, LinesCodec>,
    writer: FramedWrite<WriteHalf<S>, LinesCodec>,
    write_timeout: Option<Duration>,
}

impl<S> Participant<S>
where
    S: AsyncRead + AsyncWrite,
{
    /// Splits `stream` into a line reader bounded by `max_line_length` and a line writer.
    ///
    /// Writes that cannot complete within `write_timeout` fail with
    /// [`ErrorKind::TimedOut`], so a peer that stops reading cannot block the caller.
    #[instrument(skip(stream))]
    pub fn open(
        stream: S,
        mark: Mark,
        max_line_length: usize,
        write_timeout: Option<Duration>,
    ) -> Self {
        let (read, write) = tokio::io::split(stream);
        debug!("Opened participant stream");
        Self {
            mark,
            reader: FramedRead::new(read, LinesCodec::new_with_max_length(max_line_length)),
            writer: FramedWrite::new(write, LinesCodec::new()),
            write_timeout,
        }
    }

    /// The participant's mark.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Sends one message and flushes it.
    #[instrument(skip(self), fields(mark = %self.mark))]
    pub async fn send(&mut self, message: &ServerMessage) -> Result<(), io::Error> {
        trace!(%message, "Sending");
        let limit = self.write_timeout;
        bounded(limit, self.writer.send(message.to_string()))
            .await?
            .map_err(|e| match e {
                LinesCodecError::Io(e) => e,
                LinesCodecError::MaxLineLengthExceeded => {
                    io::Error::new(ErrorKind::InvalidData, "outbound line too long")
                }
            })
    }

    /// Waits for the next inbound line. Cancel-safe: buffered input is kept.
    pub async fn recv(&mut self) -> Inbound {
        self.reader.next().await.into()
    }

    /// Flushes and shuts down the write side.
    #[instrument(skip(self), fields(mark = %self.mark))]
    pub async fn close(&mut self) {
        let limit = self.write_timeout;
        match bounded(limit, SinkExt::<String>::close(&mut self.writer)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => debug!(%error, "Closing participant stream failed"),
            Err(error) => debug!(%error, "Closing participant stream timed out"),
        }
    }
}

/// Runs `write`, failing with [`ErrorKind::TimedOut`] once `limit` passes.
async fn bounded<F: Future>(limit: Option<Duration>, write: F) -> Result<F::Output, io::Error> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, write)
            .await
            .map_err(|_| io::Error::new(ErrorKind::TimedOut, "peer stopped reading")),
        None => Ok(write.await),
    }
}
