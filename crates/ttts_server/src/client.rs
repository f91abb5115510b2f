//! Terminal client for the match server.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info, instrument, warn};
use ttts_tictactoe::{Board, ClientCommand, Mark, Position, ServerMessage};

/// What to do with a line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Send this line to the server.
    Send(String),
    /// Disconnect.
    Quit,
}

/// Maps user input to protocol lines. A bare number becomes `MOVE <n>`.
pub fn translate_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        return Some(Input::Quit);
    }
    match line.parse::<i64>() {
        Ok(index) => Some(Input::Send(ClientCommand::Move(index).to_string())),
        Err(_) => Some(Input::Send(line.to_string())),
    }
}

/// The client's picture of the match, rebuilt from server messages.
#[derive(Debug, Clone, Default)]
pub struct ClientView {
    mark: Option<Mark>,
    board: Board,
    /// Submitted moves awaiting a verdict, oldest first. `None` is an index the board lacks.
    pending: VecDeque<Option<Position>>,
    finished: bool,
}

impl ClientView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark assigned by the server, once welcomed.
    pub fn mark(&self) -> Option<Mark> {
        self.mark
    }

    /// Local copy of the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whether the server ended the match.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Queues a submitted move so it can be placed once the server accepts it.
    ///
    /// The server answers moves in the order they were sent, so each verdict
    /// settles the oldest queued move.
    pub fn submitted(&mut self, command: &ClientCommand) {
        let ClientCommand::Move(index) = *command;
        self.pending.push_back(Position::from_wire(index));
    }

    /// Applies one server message and returns the lines to show the user.
    pub fn observe(&mut self, message: &ServerMessage) -> Vec<String> {
        self.finished |= message.is_final();
        match message {
            ServerMessage::Welcome(mark) => {
                self.mark = Some(*mark);
                vec![format!("You are playing {}", mark), self.board.display()]
            }
            ServerMessage::WaitingForOpponent => vec!["Waiting for opponent to connect".into()],
            ServerMessage::YourMove => vec!["Your move: enter a square 0-8".into()],
            ServerMessage::ValidMove => {
                if let (Some(Some(pos)), Some(mark)) = (self.pending.pop_front(), self.mark) {
                    self.place(pos, mark);
                }
                vec!["Move accepted".into(), self.board.display()]
            }
            ServerMessage::OpponentMoved(pos) => {
                if let Some(mark) = self.mark {
                    self.place(*pos, mark.opponent());
                }
                vec![
                    format!("Opponent moved to {} ({})", pos.to_index(), pos),
                    self.board.display(),
                ]
            }
            ServerMessage::InvalidMove => {
                self.pending.pop_front();
                vec!["Invalid move, choose an empty square 0-8".into()]
            }
            ServerMessage::InvalidCommand => {
                vec!["Unrecognized command, type a square number 0-8".into()]
            }
            ServerMessage::NotYourTurn => {
                self.pending.pop_front();
                vec!["Not your turn yet".into()]
            }
            ServerMessage::OpponentDisconnected => vec!["Opponent disconnected".into()],
            ServerMessage::MoveTimedOut => vec!["You took too long to move".into()],
            ServerMessage::OpponentTimedOut => vec!["Opponent took too long to move".into()],
            ServerMessage::Notice(text) => vec![text.clone()],
            ServerMessage::Victory => vec!["You win!".into()],
            ServerMessage::Defeat => vec!["You lose.".into()],
            ServerMessage::Tie => vec!["It's a tie.".into()],
        }
    }

    fn place(&mut self, pos: Position, mark: Mark) {
        if let Err(error) = self.board.place(pos, mark) {
            warn!(%error, "Local board out of sync with server");
        }
    }
}

/// Connects to a server and plays from the terminal until the match ends.
#[instrument]
pub async fn play(host: &str, port: u16) -> Result<()> {
    let stream = TcpStream::connect((host, port))
        .await
        .with_context(|| format!("Failed to connect to {}:{}", host, port))?;
    info!("Connected to server");

    let (read, write) = stream.into_split();
    let mut server = FramedRead::new(read, LinesCodec::new());
    let mut outbound = FramedWrite::new(write, LinesCodec::new());
    let mut stdin = FramedRead::new(tokio::io::stdin(), LinesCodec::new());
    let mut stdin_open = true;
    let mut view = ClientView::new();

    loop {
        tokio::select! {
            line = server.next() => match line {
                Some(Ok(line)) => match line.parse::<ServerMessage>() {
                    Ok(message) => {
                        for out in view.observe(&message) {
                            println!("{out}");
                        }
                        if view.is_finished() {
                            break;
                        }
                    }
                    Err(error) => {
                        debug!(%error, "Unrecognized server line");
                        println!("{line}");
                    }
                },
                Some(Err(e)) => return Err(e).context("Reading from server failed"),
                None => {
                    println!("Server closed the connection");
                    break;
                }
            },
            input = stdin.next(), if stdin_open => match input {
                Some(Ok(line)) => match translate_input(&line) {
                    Some(Input::Quit) => break,
                    Some(Input::Send(text)) => {
                        if let Ok(command) = ClientCommand::parse(&text) {
                            view.submitted(&command);
                        }
                        outbound.send(text).await.context("Sending to server failed")?;
                    }
                    None => {}
                },
                Some(Err(e)) => return Err(e).context("Reading stdin failed"),
                None => stdin_open = false,
            },
        }
    }

    info!("Disconnected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttts_tictactoe::Square;

    #[test]
    fn test_translate_input() {
        assert_eq!(translate_input("4"), Some(Input::Send("MOVE 4".into())));
        assert_eq!(translate_input(" MOVE 2 "), Some(Input::Send("MOVE 2".into())));
        assert_eq!(translate_input("QUIT"), Some(Input::Quit));
        assert_eq!(translate_input("   "), None);
    }

    #[test]
    fn test_view_tracks_both_marks() {
        let mut view = ClientView::new();
        view.observe(&ServerMessage::Welcome(Mark::O));
        view.observe(&ServerMessage::OpponentMoved(Position::Center));
        view.submitted(&ClientCommand::Move(0));
        view.observe(&ServerMessage::ValidMove);

        assert_eq!(view.mark(), Some(Mark::O));
        assert_eq!(view.board().get(Position::Center), Square::Occupied(Mark::X));
        assert_eq!(view.board().get(Position::TopLeft), Square::Occupied(Mark::O));
        assert!(!view.is_finished());
    }

    #[test]
    fn test_rejected_move_is_not_placed() {
        let mut view = ClientView::new();
        view.observe(&ServerMessage::Welcome(Mark::X));
        view.submitted(&ClientCommand::Move(4));
        view.observe(&ServerMessage::InvalidMove);
        view.observe(&ServerMessage::ValidMove);
        assert_eq!(view.board().occupied(), 0);
    }

    #[test]
    fn test_queued_moves_settle_in_order() {
        let mut view = ClientView::new();
        view.observe(&ServerMessage::Welcome(Mark::X));
        view.submitted(&ClientCommand::Move(4));
        view.submitted(&ClientCommand::Move(0));
        view.observe(&ServerMessage::ValidMove);
        view.observe(&ServerMessage::InvalidMove);

        assert_eq!(view.board().get(Position::Center), Square::Occupied(Mark::X));
        assert_eq!(view.board().occupied(), 1);
    }

    #[test]
    fn test_out_of_range_move_is_queued_but_never_placed() {
        let mut view = ClientView::new();
        view.observe(&ServerMessage::Welcome(Mark::X));
        view.submitted(&ClientCommand::Move(9));
        view.submitted(&ClientCommand::Move(2));
        view.observe(&ServerMessage::InvalidMove);
        view.observe(&ServerMessage::ValidMove);

        assert_eq!(view.board().get(Position::TopRight), Square::Occupied(Mark::X));
        assert_eq!(view.board().occupied(), 1);
    }

    #[test]
    fn test_disconnect_finishes() {
        let mut view = ClientView::new();
        view.observe(&ServerMessage::OpponentDisconnected);
        assert!(view.is_finished());
    }

    #[test]
    fn test_final_message_finishes() {
        let mut view = ClientView::new();
        assert_eq!(view.observe(&ServerMessage::Defeat), vec!["You lose.".to_string()]);
        assert!(view.is_finished());
    }
}
