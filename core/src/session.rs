//! # Command Sessions
//!
//! A switch session is a shell on the far end of a [`CommandChannel`]. The
//! switch gives no per-command completion signal, so commands are sent on a
//! timer described by a [`CommandScript`] while the reply stream is fed,
//! chunk by chunk and in arrival order, to a [`LineAssembler`].

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

use mcastmap_protocols::lldp;
use mcastmap_protocols::{LineAssembler, LineParser};

pub const EXIT_COMMAND: &str = "exit";
pub const MROUTE_COMMAND: &str = "show ip mroute";
pub const VERSION_COMMAND: &str = "show version";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: russh::Error,
    },

    #[error("authentication rejected for user '{user}'")]
    Authentication { user: String },

    #[error("ssh transport failure: {0}")]
    Transport(#[from] russh::Error),

    #[error("session i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// The three sessions mcastmap runs against a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Mroute,
    Lldp,
    Version,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            SessionKind::Mroute => "mroute",
            SessionKind::Lldp => "lldp",
            SessionKind::Version => "version",
        };
        f.write_str(name)
    }
}

/// An interactive shell on the switch.
#[async_trait]
pub trait CommandChannel: Send {
    /// Types one command line.
    async fn send(&mut self, command: &str) -> Result<(), SessionError>;

    /// Waits for the next chunk of output. `None` once the session is closed.
    ///
    /// Must be cancel safe: [`run_script`] drops a pending `recv` whenever a
    /// pacing delay runs out.
    async fn recv(&mut self) -> Result<Option<String>, SessionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Send(String),
    Pause(Duration),
}

/// Ordered commands and the delays between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandScript {
    steps: VecDeque<ScriptStep>,
}

impl CommandScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(mut self, command: impl Into<String>) -> Self {
        self.steps.push_back(ScriptStep::Send(command.into()));
        self
    }

    pub fn pause(mut self, delay: Duration) -> Self {
        self.steps.push_back(ScriptStep::Pause(delay));
        self
    }

    /// `show ip mroute`, then leave once the switch had time to print the table.
    pub fn mroute(settle: Duration) -> Self {
        Self::new()
            .send(MROUTE_COMMAND)
            .pause(settle)
            .send(EXIT_COMMAND)
    }

    /// One LLDP remote query per port `slot/1..=ports`, paced by `pacing`.
    pub fn lldp(slot: u8, ports: u16, settle: Duration, pacing: Duration) -> Self {
        (1..=ports)
            .fold(Self::new().pause(settle), |script, number| {
                script.send(lldp::query_command(slot, number)).pause(pacing)
            })
            .send(EXIT_COMMAND)
    }

    pub fn version(settle: Duration) -> Self {
        Self::new()
            .send(VERSION_COMMAND)
            .pause(settle)
            .send(EXIT_COMMAND)
    }

    pub fn steps(&self) -> impl Iterator<Item = &ScriptStep> {
        self.steps.iter()
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            ScriptStep::Send(command) => Some(command.as_str()),
            ScriptStep::Pause(_) => None,
        })
    }
}

/// Runs `script` on `channel`, feeding every received chunk to `assembler`
/// and every completed record to `on_record`.
///
/// Reception continues after the last command until the switch closes the
/// session. The parser is returned so the caller can check where it stopped.
/// A transport failure aborts the session; records already handed to
/// `on_record` stay where they went.
pub async fn run_script<C, P, F>(
    channel: &mut C,
    script: CommandScript,
    mut assembler: LineAssembler<P>,
    mut on_record: F,
) -> Result<P, SessionError>
where
    C: CommandChannel + ?Sized,
    P: LineParser,
    F: FnMut(P::Record),
{
    let mut steps: VecDeque<ScriptStep> = script.steps;
    let mut resume_at: Option<Instant> = None;

    loop {
        if resume_at.is_none() {
            while let Some(step) = steps.pop_front() {
                match step {
                    ScriptStep::Send(command) => {
                        debug!(%command, "sending command");
                        channel.send(&command).await?;
                    }
                    ScriptStep::Pause(delay) => {
                        resume_at = Some(Instant::now() + delay);
                        break;
                    }
                }
            }
        }

        tokio::select! {
            _ = sleep_until(resume_at.unwrap_or_else(Instant::now)), if resume_at.is_some() => {
                resume_at = None;
            }
            chunk = channel.recv() => match chunk? {
                Some(chunk) => {
                    trace!(len = chunk.len(), "chunk received");
                    for record in assembler.feed(&chunk) {
                        on_record(record);
                    }
                }
                None => break,
            }
        }
    }

    if resume_at.is_some() || !steps.is_empty() {
        debug!(remaining = steps.len(), "session closed before the script finished");
    }
    Ok(assembler.end_of_session())
}
