//! Runtime configuration shared by the scraper and the CLI.

use std::time::Duration;

pub mod maddr;

pub use maddr::{ConfigError, MaddrRange, MaddrTable};

pub const DEFAULT_ADDR: &str = "10.8.96.57";
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_CREDENTIAL: &str = "monitor";
pub const DEFAULT_LLDP_SLOT: u8 = 1;
pub const DEFAULT_LLDP_PORTS: u16 = 36;
pub const DEFAULT_PACING: Duration = Duration::from_millis(200);
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct Config {
    /// Hostname or address of the switch.
    pub addr: String,
    pub ssh_port: u16,
    pub user: String,
    pub password: String,
    /// Slot queried by the LLDP scrape (`show lldp interfaces ethernet SLOT/N remote`).
    pub lldp_slot: u8,
    /// Number of ports queried by the LLDP scrape, starting at 1.
    pub lldp_ports: u16,
    /// Delay between two per-port LLDP commands.
    ///
    /// The switch gives no completion signal, so commands are paced on a timer.
    pub pacing: Duration,
    /// Delay granted to the switch after opening a session and after a long-running command.
    pub settle: Duration,
    /// Drops whole chunks that contain a terminal escape sequence instead of
    /// stripping the sequence.
    pub legacy_escapes: bool,
    pub no_banner: bool,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            ssh_port: DEFAULT_SSH_PORT,
            user: DEFAULT_CREDENTIAL.to_string(),
            password: DEFAULT_CREDENTIAL.to_string(),
            lldp_slot: DEFAULT_LLDP_SLOT,
            lldp_ports: DEFAULT_LLDP_PORTS,
            pacing: DEFAULT_PACING,
            settle: DEFAULT_SETTLE,
            legacy_escapes: false,
            no_banner: false,
            quiet: 0,
        }
    }
}
