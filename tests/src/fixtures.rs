//! A scripted switch that answers commands with captured console output.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mcastmap_common::config::Config;
use mcastmap_core::scraper::Connector;
use mcastmap_core::session::{CommandChannel, EXIT_COMMAND, MROUTE_COMMAND, SessionError, SessionKind};
use mcastmap_protocols::lldp;

pub const PROMPT: &str = "switch [standalone: master] > ";

/// Sent when a session opens: terminal setup noise, a banner and the prompt.
pub const GREETING: &str = "\x1b[?1h\x1b=\x1b[K\r\nMellanox Onyx Switch Management\r\n\r\n";

pub const MROUTE_REPLY: &str = concat!(
    "\r\n",
    "IP Multicast Routing Table\r\n",
    "Flags: D - Dense, S - Sparse, B - Bidir Group, s - SSM Group,\r\n",
    "       C - Connected, L - Local, P - Pruned, R - RP-bit set\r\n",
    "Timers: Uptime/Expires\r\n",
    "\r\n",
    "(*, 239.10.10.20/32), RP 10.0.0.1, flags: B\r\n",
    "  Bidir-Upstream: Eth1/1\r\n",
    "  Outgoing Interface List:\r\n",
    "    Eth1/2, Forward/Sparse, 5d01h/never\r\n",
    "    Eth1/3, Forward/Sparse, 5d01h/never\r\n",
    "\r\n",
    "(*, 239.10.10.21/32), RP 10.0.0.1, flags: B\r\n",
    "  Bidir-Upstream: Eth1/1\r\n",
    "  Outgoing Interface List:\r\n",
    "    Eth1/2, Forward/Sparse, 5d01h/never\r\n",
    "\r\n",
    "(*, 239.10.10.22/32), RP 10.0.0.1, flags: B\r\n",
    "  Bidir-Upstream: Eth1/1\r\n",
    "  Outgoing Interface List:\r\n",
    "\r\n",
    "(*, 239.10.10.23/32), RP 10.0.0.1, flags: B\r\n",
    "  Bidir-Upstream: Eth1/1\r\n",
    "  Outgoing Interface List:\r\n",
    "    Eth1/2, Forward/Sparse, 5d01h/never\r\n",
    "    Eth1/7, Forward/Sparse, 5d01h/never\r\n",
    "    Loopback0, Forward/Sparse, 5d01h/never\r\n",
    "\r\n",
    "\r\n",
);

/// Subscriptions contained in [`MROUTE_REPLY`].
pub const MROUTE_SUBSCRIPTIONS: usize = 6;

/// Ports with an LLDP neighbour and the neighbour's name.
pub const NEIGHBORS: &[(u16, &str)] = &[(2, "leaf-switch-02"), (3, "leaf-switch-03")];

pub fn lldp_reply(port: u16) -> String {
    let Some((_, name)) = NEIGHBORS.iter().find(|(p, _)| *p == port) else {
        return "\r\nNo lldp remote information.\r\n\r\n".to_string();
    };
    format!(
        concat!(
            "\r\n",
            "Eth1/{port}\r\n",
            "\r\n",
            "Remote Index              : 1\r\n",
            "Remote chassis id         : 7c:fe:90:aa:bb:{port:02} ; chassis id subtype : Mac Address (4)\r\n",
            "Remote port-id            : Eth1/49 ; port id subtype : Interface Name (5)\r\n",
            "Remote port description   : N/A\r\n",
            "Remote system name        : {name}\r\n",
            "Remote system description : Onyx\r\n",
            "\r\n",
        ),
        port = port,
        name = name
    )
}

/// How a scripted session misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The session cannot be opened.
    RefuseOpen,
    /// The switch closes the session after delivering this many chunks.
    CloseAfter(usize),
    /// The transport fails after delivering this many chunks.
    FailAfter(usize),
}

pub type SentLog = Arc<Mutex<HashMap<SessionKind, Vec<String>>>>;

pub struct ScriptedSwitch {
    kind: SessionKind,
    replies: HashMap<String, String>,
    queue: VecDeque<String>,
    chunk_size: Option<usize>,
    delivered: usize,
    fault: Option<Fault>,
    closed: bool,
    sent: SentLog,
}

impl ScriptedSwitch {
    fn push_reply(&mut self, text: &str) {
        match self.chunk_size {
            Some(size) => {
                let chars: Vec<char> = text.chars().collect();
                for chunk in chars.chunks(size) {
                    self.queue.push_back(chunk.iter().collect());
                }
            }
            None => self.queue.push_back(text.to_string()),
        }
    }
}

#[async_trait]
impl CommandChannel for ScriptedSwitch {
    async fn send(&mut self, command: &str) -> Result<(), SessionError> {
        self.sent
            .lock()
            .unwrap()
            .entry(self.kind)
            .or_default()
            .push(command.to_string());

        if command == EXIT_COMMAND {
            self.closed = true;
            return Ok(());
        }

        let reply: String = self
            .replies
            .get(command)
            .cloned()
            .unwrap_or_else(|| "\r\n% Unrecognized command\r\n".to_string());
        self.push_reply(&format!("{command}\r\n{reply}{PROMPT}"));
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<String>, SessionError> {
        match self.fault {
            Some(Fault::CloseAfter(n)) if self.delivered >= n => return Ok(None),
            Some(Fault::FailAfter(n)) if self.delivered >= n => {
                return Err(SessionError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset by switch",
                )));
            }
            _ => {}
        }

        match self.queue.pop_front() {
            Some(chunk) => {
                self.delivered += 1;
                Ok(Some(chunk))
            }
            None if self.closed => Ok(None),
            None => std::future::pending().await,
        }
    }
}

/// Opens [`ScriptedSwitch`] sessions that answer the mroute and LLDP commands.
pub struct ScriptedConnector {
    pub chunk_size: Option<usize>,
    pub faults: HashMap<SessionKind, Fault>,
    pub sent: SentLog,
    lldp_slot: u8,
    lldp_ports: u16,
}

impl ScriptedConnector {
    pub fn new(cfg: &Config) -> Self {
        Self {
            chunk_size: None,
            faults: HashMap::new(),
            sent: SentLog::default(),
            lldp_slot: cfg.lldp_slot,
            lldp_ports: cfg.lldp_ports,
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    pub fn with_fault(mut self, kind: SessionKind, fault: Fault) -> Self {
        self.faults.insert(kind, fault);
        self
    }

    pub fn sent(&self, kind: SessionKind) -> Vec<String> {
        self.sent.lock().unwrap().get(&kind).cloned().unwrap_or_default()
    }

    fn replies(&self) -> HashMap<String, String> {
        let mut replies: HashMap<String, String> = HashMap::new();
        replies.insert(MROUTE_COMMAND.to_string(), MROUTE_REPLY.to_string());
        for port in 1..=self.lldp_ports {
            replies.insert(lldp::query_command(self.lldp_slot, port), lldp_reply(port));
        }
        replies
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Channel = ScriptedSwitch;

    async fn open(&self, kind: SessionKind) -> Result<ScriptedSwitch, SessionError> {
        let fault: Option<Fault> = self.faults.get(&kind).copied();
        if fault == Some(Fault::RefuseOpen) {
            return Err(SessionError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "channel open refused",
            )));
        }

        let mut switch = ScriptedSwitch {
            kind,
            replies: self.replies(),
            queue: VecDeque::new(),
            chunk_size: self.chunk_size,
            delivered: 0,
            fault,
            closed: false,
            sent: self.sent.clone(),
        };
        switch.push_reply(&format!("{GREETING}{PROMPT}"));
        Ok(switch)
    }
}

/// Settings for fast scripted runs: no pacing, eight LLDP ports.
pub fn test_config() -> Config {
    Config {
        lldp_ports: 8,
        pacing: Duration::ZERO,
        settle: Duration::ZERO,
        no_banner: true,
        ..Config::default()
    }
}
