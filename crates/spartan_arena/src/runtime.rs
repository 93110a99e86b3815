//! Async driver for an [`ArenaSession`].
//!
//! One task owns the session and applies every mutation in arrival order.
//! Handles send it commands; the opponent request runs in a child task that
//! waits out the pacing delay, reports that it is asking, calls the provider,
//! and posts the answer back with its ticket. Reset aborts that child task, and the ticket check drops
//! anything it managed to post before dying.

use crate::coordinator::{Resolution, TurnTicket};
use crate::provider::{MoveProvider, ProviderError};
use crate::session::{ArenaSession, GameEvent, SessionSnapshot};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Timing for opponent turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct RuntimeSettings {
    /// Pause before the provider is asked.
    pub think_delay: Duration,
    /// Upper bound on one provider call.
    pub request_timeout: Duration,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            think_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Result of a click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickOutcome {
    /// False when the click was ignored.
    pub accepted: bool,
    /// Session state after the click.
    pub snapshot: SessionSnapshot,
}

/// The runtime task has stopped.
#[derive(Debug, Clone, Copy, Display, Error)]
#[display("Session runtime has stopped")]
pub struct SessionClosed;

enum Command {
    Click {
        index: usize,
        reply: oneshot::Sender<ClickOutcome>,
    },
    Reset {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Click { index, .. } => write!(f, "Click({index})"),
            Command::Reset { .. } => write!(f, "Reset"),
            Command::Snapshot { .. } => write!(f, "Snapshot"),
        }
    }
}

enum Opponent {
    Requested(TurnTicket),
    Answer {
        ticket: TurnTicket,
        result: Result<usize, ProviderError>,
    },
}

/// Cloneable handle to a running session.
///
/// The runtime stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    /// Clicks a cell as the human.
    pub async fn click(&self, index: usize) -> Result<ClickOutcome, SessionClosed> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Click { index, reply })?;
        rx.await.map_err(|_| SessionClosed)
    }

    /// Starts a new game.
    pub async fn reset(&self) -> Result<SessionSnapshot, SessionClosed> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Reset { reply })?;
        rx.await.map_err(|_| SessionClosed)
    }

    /// Current session state.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionClosed> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply })?;
        rx.await.map_err(|_| SessionClosed)
    }

    fn send(&self, command: Command) -> Result<(), SessionClosed> {
        self.commands.send(command).map_err(|_| SessionClosed)
    }
}

/// Spawns the runtime task for `session`.
///
/// Returns a handle and the event stream. Dropping the receiver is fine;
/// events are then discarded.
#[instrument(skip(session, provider), fields(provider = provider.name()))]
pub fn spawn(
    session: ArenaSession,
    provider: Arc<dyn MoveProvider>,
    settings: RuntimeSettings,
) -> (SessionHandle, mpsc::UnboundedReceiver<GameEvent>) {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (answers_tx, answers_rx) = mpsc::unbounded_channel();

    let runtime = Runtime {
        session,
        provider,
        settings,
        events: events_tx,
        answers: answers_tx,
        pending: None,
    };
    tokio::spawn(runtime.run(commands_rx, answers_rx));
    info!("Session runtime started");

    (
        SessionHandle {
            commands: commands_tx,
        },
        events_rx,
    )
}

struct Runtime {
    session: ArenaSession,
    provider: Arc<dyn MoveProvider>,
    settings: RuntimeSettings,
    events: mpsc::UnboundedSender<GameEvent>,
    answers: mpsc::UnboundedSender<Opponent>,
    pending: Option<JoinHandle<()>>,
}

impl Runtime {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut answers: mpsc::UnboundedReceiver<Opponent>,
    ) {
        self.schedule_opponent();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some(message) = answers.recv() => self.on_opponent(message),
            }
        }

        self.cancel_pending();
        info!("Session runtime stopped");
    }

    #[instrument(skip(self))]
    fn handle(&mut self, command: Command) {
        match command {
            Command::Click { index, reply } => {
                let accepted = match self.session.click(index) {
                    Ok(events) => {
                        self.emit(events);
                        self.schedule_opponent();
                        true
                    }
                    Err(e) => {
                        debug!(error = %e, "Click ignored");
                        false
                    }
                };
                let _ = reply.send(ClickOutcome {
                    accepted,
                    snapshot: self.session.snapshot(),
                });
            }
            Command::Reset { reply } => {
                self.cancel_pending();
                let events = self.session.reset();
                self.emit(events);
                self.schedule_opponent();
                let _ = reply.send(self.session.snapshot());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
        }
    }

    fn on_opponent(&mut self, message: Opponent) {
        let (ticket, result) = match message {
            Opponent::Requested(ticket) => {
                let event = self.session.opponent_requested(ticket);
                self.emit(event);
                return;
            }
            Opponent::Answer { ticket, result } => (ticket, result),
        };
        let (resolution, events) = self.session.resolve_opponent(ticket, result);
        if resolution == Resolution::Stale {
            return;
        }
        self.pending = None;
        self.emit(events);
        self.schedule_opponent();
    }

    /// Spawns the opponent request if the opponent is due.
    fn schedule_opponent(&mut self) {
        let Some(opponent) = self.session.begin_opponent_turn() else {
            return;
        };
        let ticket = *opponent.ticket();
        let request = opponent.request().clone();
        let provider = Arc::clone(&self.provider);
        let settings = self.settings;
        let answers = self.answers.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(settings.think_delay).await;
            debug!(provider = provider.name(), "Requesting opponent move");
            if answers.send(Opponent::Requested(ticket)).is_err() {
                return;
            }

            let result = tokio::time::timeout(settings.request_timeout, provider.request_move(&request))
                .await
                .unwrap_or_else(|_| {
                    Err(ProviderError::new(format!(
                        "No answer within {:?}",
                        settings.request_timeout
                    )))
                });

            if answers.send(Opponent::Answer { ticket, result }).is_err() {
                debug!("Runtime gone before the opponent answered");
            }
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!("Cancelling in-flight opponent request");
            handle.abort();
        }
    }

    fn emit(&self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            let _ = self.events.send(event);
        }
    }
}
