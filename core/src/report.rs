//! Per-port report rows, joined from the fact tables.

use crate::store::FactStore;

/// Shown in place of a neighbour name when LLDP reported nothing for a port.
pub const NO_NEIGHBOR: &str = "loopback";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub group: String,
    /// Configured name of the group address, if any.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortReport {
    pub port: String,
    /// `None` when no LLDP neighbour was seen, typically a loopback or internal port.
    pub neighbor: Option<String>,
    pub group_count: usize,
    pub groups: Vec<GroupEntry>,
}

impl PortReport {
    pub fn neighbor_label(&self) -> &str {
        self.neighbor.as_deref().unwrap_or(NO_NEIGHBOR)
    }
}

/// One row per subscribed port, in the order the ports first appeared.
pub fn build(store: &FactStore) -> Vec<PortReport> {
    store
        .subscribed_ports()
        .into_iter()
        .map(|port| {
            let groups: Vec<GroupEntry> = store
                .groups_for_port(&port)
                .into_iter()
                .map(|group| GroupEntry {
                    name: store.name_for_group(&group),
                    group,
                })
                .collect();
            PortReport {
                neighbor: store.neighbor_for_port(&port),
                group_count: store.group_count(&port),
                groups,
                port,
            }
        })
        .collect()
}
