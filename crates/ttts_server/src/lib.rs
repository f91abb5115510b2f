//! ttts server library - two-player tic-tac-toe over newline-delimited text.
//!
//! # Architecture
//!
//! - **Acceptor**: pairs TCP connections in arrival order (first is X)
//! - **Engine**: one match per pair, handshake then a strictly alternating turn loop
//! - **Participant**: a peer's line reader and writer
//! - **Client**: a terminal front end speaking the same protocol
//!
//! The engine works over any `AsyncRead + AsyncWrite` stream, so matches can
//! be driven from in-memory pipes as easily as from sockets.
//!
//! # Example
//!
//! ```no_run
//! use ttts_server::{Acceptor, ServerConfig, serve};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default().with_port(58901);
//! let acceptor = Acceptor::bind(&config).await?;
//! serve(acceptor, config).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod acceptor;
pub mod cli;
pub mod client;
mod config;
mod engine;
mod error;
mod participant;

// Crate-level exports - Acceptor
pub use acceptor::{Acceptor, serve};

// Crate-level exports - Configuration
pub use config::ServerConfig;

// Crate-level exports - Match engine
pub use engine::{MatchFinished, MatchInProgress, MatchOutcome, MatchSetup, run_match};

// Crate-level exports - Errors
pub use error::{ConfigError, MatchError, MatchErrorKind};

// Crate-level exports - Participants
pub use participant::{Inbound, Participant};
