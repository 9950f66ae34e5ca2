//! Port-name normalisation.
//!
//! Subscriptions and LLDP neighbours are joined on the port name, so both
//! parsers must spell a port the same way. The switch prints `Eth1/2` in the
//! mroute dump while the LLDP command is issued as `ethernet 1/2`; both end up
//! as `Eth1/2`.

const ETH_PREFIX: &str = "Eth";

/// Normalises a port identifier: trims whitespace and rewrites any
/// `eth`/`ethernet` prefix (any case) to `Eth`. Other names are only trimmed.
pub fn normalize(raw: &str) -> String {
    let trimmed: &str = raw.trim();
    let lower: String = trimmed.to_ascii_lowercase();

    for prefix in ["ethernet", "eth"] {
        if lower.starts_with(prefix) {
            let rest: &str = trimmed[prefix.len()..].trim_start();
            if rest.starts_with(|c: char| c.is_ascii_digit()) {
                return format!("{ETH_PREFIX}{rest}");
            }
        }
    }

    trimmed.to_string()
}

/// Builds the canonical name of an ethernet port from its slot and number.
pub fn ethernet(slot: &str, number: &str) -> String {
    format!("{ETH_PREFIX}{}/{}", slot.trim(), number.trim())
}
