//! Command-line interface for ttts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ttts - two-player tic-tac-toe over a line protocol
#[derive(Parser, Debug)]
#[command(name = "ttts")]
#[command(about = "Two-player tic-tac-toe server and terminal client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pair incoming connections into matches
    Serve {
        /// Path to a TOML config file (defaults are used if it does not exist)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Seconds a player has to move, 0 to wait forever (overrides the config file)
        #[arg(long)]
        move_timeout: Option<u64>,

        /// Play one match and exit
        #[arg(long)]
        single: bool,
    },

    /// Connect to a server and play from the terminal
    Play {
        /// Server host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(short, long, default_value = "58901")]
        port: u16,
    },
}
