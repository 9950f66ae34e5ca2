//! # LLDP Remote Neighbour Parser
//!
//! The LLDP scrape issues `show lldp interfaces ethernet S/N remote` once per
//! port. The echoed command tells the parser which port the following reply
//! belongs to; the `Remote system name` line of the reply carries the
//! neighbour.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use mcastmap_common::facts::LldpNeighbor;
use mcastmap_common::port;

use crate::LineParser;

pub const REMOTE_NAME_MARKER: &str = "Remote system name";

static QUERY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"show lldp interfaces ethernet (\d+)/(\d+) remote").expect("Invalid regex pattern")
});

/// Builds the per-port command the parser expects to see echoed.
pub fn query_command(slot: u8, number: u16) -> String {
    format!("show lldp interfaces ethernet {slot}/{number} remote")
}

#[derive(Debug, Default)]
pub struct LldpParser {
    current_port: Option<String>,
}

impl LldpParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently queried port.
    pub fn current_port(&self) -> Option<&str> {
        self.current_port.as_deref()
    }
}

impl LineParser for LldpParser {
    type Record = LldpNeighbor;

    fn process_line(&mut self, line: &str) -> Option<LldpNeighbor> {
        if let Some(caps) = QUERY_RE.captures(line) {
            let port_name: String = port::ethernet(&caps[1], &caps[2]);
            trace!(port = %port_name, "lldp query echoed");
            self.current_port = Some(port_name);
            return None;
        }

        let (_, after) = line.split_once(REMOTE_NAME_MARKER)?;
        let value: &str = after.split_once(':').map_or(after, |(_, value)| value);
        let remote_host: &str = value.trim();

        match self.current_port.as_deref() {
            Some(port_name) if !remote_host.is_empty() => {
                Some(LldpNeighbor::new(port_name, remote_host))
            }
            Some(port_name) => {
                debug!(port = port_name, "empty remote system name");
                None
            }
            None => {
                debug!(remote_host, "remote system name before any port was queried");
                None
            }
        }
    }
}
