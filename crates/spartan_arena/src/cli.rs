//! Command-line interface for spartan_arena.

use clap::{Parser, Subcommand};
use spartan_arena::OpponentKind;
use spartan_tictactoe::Side;
use std::path::PathBuf;

/// Spartan Arena - tic-tac-toe against an LLM opponent
#[derive(Parser, Debug)]
#[command(name = "spartan_arena")]
#[command(about = "Tic-tac-toe arena with daily orders", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the arena config file
    #[arg(short, long, global = true, default_value = "arena.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Side the human plays (spartan or persian)
        #[arg(long)]
        side: Option<Side>,

        /// Opponent provider
        #[arg(long, value_enum)]
        opponent: Option<OpponentKind>,
    },

    /// Serve the JSON API
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Side the human plays (spartan or persian)
        #[arg(long)]
        side: Option<Side>,

        /// Opponent provider
        #[arg(long, value_enum)]
        opponent: Option<OpponentKind>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_overrides_parse() {
        let cli = Cli::try_parse_from([
            "spartan_arena",
            "play",
            "--side",
            "persian",
            "--opponent",
            "first-empty",
        ])
        .unwrap();
        match cli.command {
            Command::Play { side, opponent } => {
                assert_eq!(side, Some(Side::Persian));
                assert_eq!(opponent, Some(OpponentKind::FirstEmpty));
            }
            other => panic!("expected play, got {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("arena.toml"));
    }

    #[test]
    fn test_serve_defaults_and_bad_side() {
        let cli = Cli::try_parse_from(["spartan_arena", "serve", "--side", "SPARTAN"]).unwrap();
        match cli.command {
            Command::Serve { port, host, side, .. } => {
                assert_eq!(port, 3000);
                assert_eq!(host, "127.0.0.1");
                assert_eq!(side, Some(Side::Spartan));
            }
            other => panic!("expected serve, got {other:?}"),
        }
        assert!(Cli::try_parse_from(["spartan_arena", "play", "--side", "athenian"]).is_err());
    }
}
