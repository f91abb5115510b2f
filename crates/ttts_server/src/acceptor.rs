//! TCP acceptor: pairs incoming connections into matches.

use crate::config::ServerConfig;
use crate::engine::run_match;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, error, info, info_span, instrument, warn};

/// Listener that hands out connections two at a time, in arrival order.
#[derive(Debug)]
pub struct Acceptor {
    listener: TcpListener,
}

impl Acceptor {
    /// Binds to the configured host and port.
    #[instrument(skip(config), fields(address = %config.bind_address()))]
    pub async fn bind(config: &ServerConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.bind_address()).await?;
        info!(address = %listener.local_addr()?, "Tic Tac Toe server is running");
        Ok(Self { listener })
    }

    /// The bound address (useful when binding port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for two connections. The first plays X, the second O.
    #[instrument(skip(self))]
    pub async fn accept_two(&self) -> std::io::Result<(TcpStream, TcpStream)> {
        let (first, addr) = self.listener.accept().await?;
        info!(%addr, "First player connected, waiting for second player");
        let (second, addr) = self.listener.accept().await?;
        info!(%addr, "Second player connected, starting the game");
        Ok((first, second))
    }
}

/// Pairs connections into matches until the process stops.
///
/// Each match runs on its own task and shares nothing with the others. With
/// `single_match` set, exactly one match is played and the function returns
/// once it ends. Match failures are logged, never propagated.
#[instrument(skip_all)]
pub async fn serve(acceptor: Acceptor, config: ServerConfig) -> std::io::Result<()> {
    let mut match_id: u64 = 0;

    loop {
        let (stream_x, stream_o) = match acceptor.accept_two().await {
            Ok(pair) => pair,
            Err(e) => {
                if *config.single_match() {
                    return Err(e);
                }
                warn!(error = %e, "Accepting players failed");
                continue;
            }
        };
        match_id += 1;
        let span = info_span!("match", id = match_id);

        if *config.single_match() {
            play(stream_x, stream_o, &config).instrument(span).await;
            return Ok(());
        }

        let config = config.clone();
        tokio::spawn(async move { play(stream_x, stream_o, &config).await }.instrument(span));
    }
}

async fn play(stream_x: TcpStream, stream_o: TcpStream, config: &ServerConfig) {
    match run_match(stream_x, stream_o, config).await {
        Ok(finished) => info!(outcome = %finished.outcome(), "Match complete"),
        Err(e) => error!(error = %e, "Match failed"),
    }
}
