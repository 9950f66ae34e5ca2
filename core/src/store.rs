//! # Fact Store
//!
//! In-memory tables filled by the scrapes and read by the report.
//!
//! The mroute scrape only writes subscriptions and the LLDP scrape only
//! writes neighbours, so each table has its own lock and the two sessions
//! never contend. Reports are built after both sessions are done.

use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;

use parking_lot::RwLock;
use tracing::{debug, warn};

use mcastmap_common::config::{ConfigError, MaddrTable};
use mcastmap_common::facts::{LldpNeighbor, MaddrMapping, Subscription};
use mcastmap_common::port;

#[derive(Debug, Default)]
pub struct FactStore {
    subscriptions: RwLock<Vec<Subscription>>,
    neighbors: RwLock<Vec<LldpNeighbor>>,
    maddr_names: RwLock<HashMap<String, String>>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_subscription(&self, subscription: Subscription) {
        self.subscriptions.write().push(subscription);
    }

    pub fn insert_lldp_neighbor(&self, neighbor: LldpNeighbor) {
        self.neighbors.write().push(neighbor);
    }

    /// Inserts a multicast address name unless the address already has one.
    ///
    /// Returns `true` if the mapping was stored. A second name for a known
    /// address is a configuration conflict; the first name stays.
    pub fn insert_maddr_mapping(&self, mapping: MaddrMapping) -> bool {
        match self.maddr_names.write().entry(mapping.address) {
            Entry::Occupied(entry) => {
                if *entry.get() != mapping.name {
                    warn!(
                        address = %entry.key(),
                        kept = %entry.get(),
                        dropped = %mapping.name,
                        "multicast address mapped to two names"
                    );
                }
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(mapping.name);
                true
            }
        }
    }

    /// Expands `table` and inserts every mapping. Returns how many were new.
    pub fn load_maddr_table(&self, table: &MaddrTable) -> Result<usize, ConfigError> {
        let mappings: Vec<MaddrMapping> = table.mappings()?;
        let total: usize = mappings.len();
        let inserted: usize = mappings
            .into_iter()
            .filter(|mapping| self.insert_maddr_mapping(mapping.clone()))
            .count();
        debug!(inserted, total, "loaded multicast address names");
        Ok(inserted)
    }

    /// Every port with at least one subscription, in first-seen order.
    pub fn subscribed_ports(&self) -> Vec<String> {
        let subscriptions = self.subscriptions.read();
        let mut seen: HashSet<&str> = HashSet::new();
        subscriptions
            .iter()
            .filter(|s| seen.insert(s.port.as_str()))
            .map(|s| s.port.clone())
            .collect()
    }

    /// Number of subscription rows for `port`, duplicates included.
    pub fn group_count(&self, port_name: &str) -> usize {
        let port_name: String = port::normalize(port_name);
        self.subscriptions
            .read()
            .iter()
            .filter(|s| s.port == port_name)
            .count()
    }

    pub fn groups_for_port(&self, port_name: &str) -> Vec<String> {
        let port_name: String = port::normalize(port_name);
        self.subscriptions
            .read()
            .iter()
            .filter(|s| s.port == port_name)
            .map(|s| s.group.clone())
            .collect()
    }

    /// The LLDP neighbour seen on `port`, if any.
    ///
    /// `None` is normal for loopback or internal ports.
    pub fn neighbor_for_port(&self, port_name: &str) -> Option<String> {
        let port_name: String = port::normalize(port_name);
        self.neighbors
            .read()
            .iter()
            .find(|n| n.port == port_name)
            .map(|n| n.remote_host.clone())
    }

    /// Configured name of a group, looked up by its literal (`239.1.1.1/32`)
    /// and then by the bare address.
    pub fn name_for_group(&self, group: &str) -> Option<String> {
        let names = self.maddr_names.read();
        names
            .get(group)
            .or_else(|| {
                let (address, _prefix) = group.split_once('/')?;
                names.get(address)
            })
            .cloned()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbors.read().len()
    }

    pub fn maddr_count(&self) -> usize {
        self.maddr_names.read().len()
    }
}
