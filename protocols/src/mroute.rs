//! # `show ip mroute` Parser
//!
//! The dump is a banner, a preamble closed by a blank line, then one block
//! per multicast group:
//!
//! ```text
//! (*, 239.10.10.20/32), RP 10.0.0.1, flags: B
//!   Bidir-Upstream: Eth1/1
//!   Outgoing Interface List:
//!     Eth1/2, Forward/Sparse, 5d01h/never
//!     Eth1/3, Forward/Sparse, 5d01h/never
//!
//! ```
//!
//! There is no explicit end marker: the dump is over when the line where the
//! next group header should be does not hold one, or when the prompt shows up
//! in the middle of an interface list.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use mcastmap_common::facts::Subscription;

use crate::LineParser;

pub const BANNER: &str = "IP Multicast Routing Table";

static GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\*, (\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}/\d{1,2})\)")
        .expect("Invalid regex pattern")
});
static RP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"RP (\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})").expect("Invalid regex pattern")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MrouteState {
    /// Waiting for the routing table banner.
    #[default]
    Default,
    /// Skipping the preamble up to the first blank line.
    IgnorePreamble,
    /// Expecting a group header; anything else ends the dump.
    CheckMcastGroup,
    ParseBidirUpstream,
    IgnoreListHeading,
    ParseOutgoingInterfaceList,
}

/// Per-session scratch values the transitions read and write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MrouteScratch {
    /// Group literal of the block being parsed, e.g. `239.10.10.20/32`.
    pub group: String,
    /// Captured from the group header, not used further.
    pub rendezvous_point: Option<String>,
}

/// Advances the state machine by one line.
pub fn transition(
    state: MrouteState,
    scratch: &mut MrouteScratch,
    line: &str,
) -> (MrouteState, Option<Subscription>) {
    match state {
        MrouteState::Default => {
            if line.contains(BANNER) {
                *scratch = MrouteScratch::default();
                (MrouteState::IgnorePreamble, None)
            } else {
                (MrouteState::Default, None)
            }
        }
        MrouteState::IgnorePreamble => {
            if is_blank(line) {
                (MrouteState::CheckMcastGroup, None)
            } else {
                (MrouteState::IgnorePreamble, None)
            }
        }
        MrouteState::CheckMcastGroup => match GROUP_RE.captures(line) {
            Some(caps) => {
                scratch.group = caps[1].to_string();
                scratch.rendezvous_point = RP_RE.captures(line).map(|rp| rp[1].to_string());
                (MrouteState::ParseBidirUpstream, None)
            }
            None => (MrouteState::Default, None),
        },
        MrouteState::ParseBidirUpstream => (MrouteState::IgnoreListHeading, None),
        MrouteState::IgnoreListHeading => (MrouteState::ParseOutgoingInterfaceList, None),
        MrouteState::ParseOutgoingInterfaceList => {
            if line.contains('\r') {
                (MrouteState::Default, None)
            } else if is_blank(line) {
                (MrouteState::CheckMcastGroup, None)
            } else {
                let port: &str = line.split(',').next().unwrap_or_default().trim();
                if port.is_empty() {
                    trace!(line, "interface line without a port name");
                    return (MrouteState::ParseOutgoingInterfaceList, None);
                }
                let subscription = Subscription::new(scratch.group.clone(), port);
                (MrouteState::ParseOutgoingInterfaceList, Some(subscription))
            }
        }
    }
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

#[derive(Debug, Default)]
pub struct MrouteParser {
    state: MrouteState,
    scratch: MrouteScratch,
}

impl MrouteParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MrouteState {
        self.state
    }

    pub fn scratch(&self) -> &MrouteScratch {
        &self.scratch
    }

    /// `true` when the parser is back in [`MrouteState::Default`].
    ///
    /// A session that closes anywhere else produced an incomplete dump.
    pub fn is_idle(&self) -> bool {
        self.state == MrouteState::Default
    }
}

impl LineParser for MrouteParser {
    type Record = Subscription;

    fn process_line(&mut self, line: &str) -> Option<Subscription> {
        let (next, record) = transition(self.state, &mut self.scratch, line);
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "mroute parser transition");
        }
        self.state = next;
        record
    }
}
