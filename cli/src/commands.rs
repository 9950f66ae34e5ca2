pub mod maddr;
pub mod scrape;
pub mod version;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use mcastmap_common::config::{
    Config, DEFAULT_ADDR, DEFAULT_CREDENTIAL, DEFAULT_LLDP_PORTS, DEFAULT_LLDP_SLOT,
    DEFAULT_PACING, DEFAULT_SETTLE, DEFAULT_SSH_PORT,
};

#[derive(Parser)]
#[command(name = "mcastmap")]
#[command(about = "Maps the multicast groups leaving each port of a switch.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Hostname or ip address of the switch to contact
    #[arg(short, long, global = true, default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// SSH port of the switch
    #[arg(long, global = true, default_value_t = DEFAULT_SSH_PORT)]
    pub ssh_port: u16,

    #[arg(short, long, global = true, default_value = DEFAULT_CREDENTIAL)]
    pub user: String,

    #[arg(long, global = true, default_value = DEFAULT_CREDENTIAL)]
    pub password: String,

    /// Milliseconds the switch is given to answer a long command
    #[arg(long, global = true, default_value_t = DEFAULT_SETTLE.as_millis() as u64)]
    pub settle_ms: u64,

    /// Drop whole output chunks containing terminal escape sequences
    #[arg(long, global = true)]
    pub legacy_escapes: bool,

    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Less output (-q, -qq)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape mroutes and LLDP neighbours and report groups per port
    #[command(alias = "s")]
    Scrape {
        /// File naming multicast address ranges
        #[arg(short, long)]
        maddr_file: Option<PathBuf>,
        /// Slot of the ports queried for LLDP neighbours
        #[arg(long, default_value_t = DEFAULT_LLDP_SLOT)]
        lldp_slot: u8,
        /// Number of ports queried for LLDP neighbours
        #[arg(long, default_value_t = DEFAULT_LLDP_PORTS)]
        lldp_ports: u16,
        /// Milliseconds between two LLDP queries
        #[arg(long, default_value_t = DEFAULT_PACING.as_millis() as u64)]
        pacing_ms: u64,
    },
    /// Show the software version the switch is running
    #[command(alias = "v")]
    Version,
    /// Show the multicast names a file defines, without contacting the switch
    #[command(alias = "m")]
    Maddr {
        #[arg(short, long)]
        maddr_file: PathBuf,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        let mut cfg = Config {
            addr: self.addr.clone(),
            ssh_port: self.ssh_port,
            user: self.user.clone(),
            password: self.password.clone(),
            settle: Duration::from_millis(self.settle_ms),
            legacy_escapes: self.legacy_escapes,
            no_banner: self.no_banner,
            quiet: self.quiet,
            ..Config::default()
        };

        if let Commands::Scrape {
            lldp_slot,
            lldp_ports,
            pacing_ms,
            ..
        } = &self.command
        {
            cfg.lldp_slot = *lldp_slot;
            cfg.lldp_ports = *lldp_ports;
            cfg.pacing = Duration::from_millis(*pacing_ms);
        }
        cfg
    }
}
