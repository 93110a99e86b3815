//! Line-oriented terminal front end.
//!
//! Reads one command per line from stdin: `1`-`9` claims a cell, `n` starts
//! a new battle, `q` quits. Board and status are redrawn after every change.

use crate::runtime::SessionHandle;
use crate::session::{GameEvent, SessionSnapshot};
use spartan_tictactoe::Position;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// One parsed line of terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Claim the cell at this index.
    Cell(usize),
    /// Start a new game.
    NewBattle,
    /// Leave.
    Quit,
}

impl PlayerInput {
    /// Parses a line; unknown input yields `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            "q" | "Q" => Some(Self::Quit),
            "n" | "N" => Some(Self::NewBattle),
            _ => Position::from_cell_number(line).map(|p| Self::Cell(p.to_index())),
        }
    }
}

/// Renders the board, status line, and daily orders.
pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&snapshot.board_display());
    out.push_str("\n\n");
    out.push_str(&snapshot.status);
    out.push_str("\n\nDaily Orders:\n");
    for objective in &snapshot.objectives {
        let mark = if objective.is_complete() { 'x' } else { ' ' };
        out.push_str(&format!(
            "  [{}] {} ({}/{})\n",
            mark,
            objective.description(),
            objective.progress(),
            objective.target()
        ));
    }
    out
}

/// Runs the terminal loop until `q` or end of input.
#[instrument(skip_all)]
pub async fn run(
    handle: SessionHandle,
    mut events: mpsc::UnboundedReceiver<GameEvent>,
) -> anyhow::Result<()> {
    info!("Starting terminal arena");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let snapshot = handle.snapshot().await?;
    let human = snapshot.human_side;
    println!("{}", render(&snapshot));
    println!("Enter 1-9 to strike, n for a new battle, q to quit.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                match PlayerInput::parse(&line) {
                    Some(PlayerInput::Quit) => break,
                    Some(PlayerInput::NewBattle) => {
                        println!("{}", render(&handle.reset().await?));
                    }
                    Some(PlayerInput::Cell(index)) => {
                        let outcome = handle.click(index).await?;
                        if !outcome.accepted {
                            println!("That square cannot be taken.");
                        }
                        println!("{}", render(&outcome.snapshot));
                    }
                    None => println!("Enter 1-9, n, or q."),
                }
            }
            Some(event) = events.recv() => {
                debug!(?event, "Session event");
                if let GameEvent::MoveMade { side, fallback, .. } = event
                    && side != human
                {
                    if fallback {
                        println!("The enemy falters and takes the first open square.");
                    }
                    println!("{}", render(&handle.snapshot().await?));
                }
            }
        }
    }

    info!("Leaving the arena");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ArenaSession;
    use spartan_tictactoe::{ObjectiveTracker, Side};

    #[test]
    fn test_parse_input() {
        assert_eq!(PlayerInput::parse("5\n"), Some(PlayerInput::Cell(4)));
        assert_eq!(PlayerInput::parse(" n "), Some(PlayerInput::NewBattle));
        assert_eq!(PlayerInput::parse("q"), Some(PlayerInput::Quit));
        assert_eq!(PlayerInput::parse("0"), None);
        assert_eq!(PlayerInput::parse("attack"), None);
    }

    #[test]
    fn test_render_lists_orders() {
        let session = ArenaSession::new(Side::Spartan, ObjectiveTracker::default());
        let text = render(&session.snapshot());
        assert!(text.starts_with("1|2|3"));
        assert!(text.contains("Your Move, Warrior"));
        assert!(text.contains("[ ] Play 3 Games (0/3)"));
    }
}
