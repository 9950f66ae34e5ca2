//! # Switch Scraper
//!
//! Runs the mroute scrape and the LLDP scrape against one switch at the same
//! time. Each scrape owns its channel, line assembler and parser; the only
//! thing they share is the [`FactStore`], and they write to different tables
//! of it.
//!
//! The transport is reached through the [`Connector`] abstraction so the
//! orchestration here does not depend on SSH; [`ssh`] holds the real one.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use mcastmap_common::config::Config;
use mcastmap_protocols::{
    EscapePolicy, LineAssembler, LldpParser, MrouteParser, MrouteState, TranscriptParser,
};

use crate::session::{CommandChannel, CommandScript, SessionError, SessionKind, run_script};
use crate::store::FactStore;

pub mod ssh;

/// Opens interactive sessions on one switch.
#[async_trait]
pub trait Connector: Send + Sync {
    type Channel: CommandChannel;

    async fn open(&self, kind: SessionKind) -> Result<Self::Channel, SessionError>;
}

/// What one scrape session achieved.
#[derive(Debug)]
pub struct SessionReport {
    pub kind: SessionKind,
    pub outcome: Result<SessionStats, SessionError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Records written to the store.
    pub records: usize,
    /// `false` when the output ended before the parser got back to idle.
    pub completed: bool,
}

#[derive(Debug)]
pub struct ScrapeSummary {
    pub mroute: SessionReport,
    pub lldp: SessionReport,
}

impl ScrapeSummary {
    pub fn all_failed(&self) -> bool {
        self.mroute.outcome.is_err() && self.lldp.outcome.is_err()
    }
}

pub fn escape_policy(cfg: &Config) -> EscapePolicy {
    if cfg.legacy_escapes {
        EscapePolicy::DropChunk
    } else {
        EscapePolicy::Strip
    }
}

/// Runs both scrapes concurrently and waits for both, whichever ends first.
pub async fn perform_scrape<C: Connector>(
    connector: &C,
    store: &FactStore,
    cfg: &Config,
) -> ScrapeSummary {
    let (mroute, lldp) = tokio::join!(
        scrape_mroutes(connector, store, cfg),
        scrape_lldp_remotes(connector, store, cfg),
    );

    let summary = ScrapeSummary {
        mroute: SessionReport {
            kind: SessionKind::Mroute,
            outcome: mroute,
        },
        lldp: SessionReport {
            kind: SessionKind::Lldp,
            outcome: lldp,
        },
    };

    for report in [&summary.mroute, &summary.lldp] {
        if let Ok(stats) = &report.outcome {
            info!(kind = %report.kind, records = stats.records, "scrape finished");
        }
    }

    summary
}

async fn scrape_mroutes<C: Connector>(
    connector: &C,
    store: &FactStore,
    cfg: &Config,
) -> Result<SessionStats, SessionError> {
    let mut channel = connector.open(SessionKind::Mroute).await?;
    debug!("mroute session open");

    let mut records: usize = 0;
    let assembler = LineAssembler::with_policy(MrouteParser::new(), escape_policy(cfg));
    let parser: MrouteParser = run_script(
        &mut channel,
        CommandScript::mroute(cfg.settle),
        assembler,
        |subscription| {
            store.insert_subscription(subscription);
            records += 1;
        },
    )
    .await?;

    let completed: bool = parser.is_idle();
    if !completed {
        let state: MrouteState = parser.state();
        warn!(?state, "mroute output ended before the routing table was complete");
    }
    Ok(SessionStats { records, completed })
}

async fn scrape_lldp_remotes<C: Connector>(
    connector: &C,
    store: &FactStore,
    cfg: &Config,
) -> Result<SessionStats, SessionError> {
    let mut channel = connector.open(SessionKind::Lldp).await?;
    debug!(ports = cfg.lldp_ports, "lldp session open");

    let mut records: usize = 0;
    let script = CommandScript::lldp(cfg.lldp_slot, cfg.lldp_ports, cfg.settle, cfg.pacing);
    let assembler = LineAssembler::with_policy(LldpParser::new(), escape_policy(cfg));
    run_script(&mut channel, script, assembler, |neighbor| {
        store.insert_lldp_neighbor(neighbor);
        records += 1;
    })
    .await?;

    Ok(SessionStats {
        records,
        completed: true,
    })
}

/// Runs `show version` and returns the switch's reply line by line.
pub async fn fetch_version<C: Connector>(connector: &C, cfg: &Config) -> Result<Vec<String>, SessionError> {
    let mut channel = connector.open(SessionKind::Version).await?;
    let mut lines: Vec<String> = Vec::new();
    let assembler = LineAssembler::with_policy(TranscriptParser, escape_policy(cfg));
    run_script(
        &mut channel,
        CommandScript::version(cfg.settle),
        assembler,
        |line| lines.push(line),
    )
    .await?;
    Ok(lines)
}
