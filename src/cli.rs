//! Command-line interface for ultimate_ttt.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ultimate tic-tac-toe: three nested boards, two players
#[derive(Parser, Debug)]
#[command(name = "ultimate_ttt")]
#[command(about = "Recursive tic-tac-toe, hotseat or over TCP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults apply if it does not exist)
    #[arg(short, long, global = true, default_value = "ultimate_ttt.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Both players at this terminal
    Local,

    /// Wait for a guest to connect, then play X
    Host {
        /// Port to listen on (config `default_port` if omitted)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Connect to a host and play O
    Join {
        /// Host address, e.g. 192.168.1.20:7878
        addr: String,
    },

    /// Print a saved game and exit
    Show {
        /// Saved game file
        file: PathBuf,
    },
}
