//! # Multicast Name Configuration
//!
//! Loads the optional table that gives multicast addresses human-readable
//! names. The file is flat `key = value` text:
//!
//! ```text
//! # base-address,extent,port entries
//! ranges = 239.10.10.0,16,Eth1/2; 239.10.20.0,4,Eth1/3
//! names  = camera; audio
//! ```
//!
//! `names` runs parallel to `ranges`. Each range expands to `extent`
//! consecutive addresses named `<name>-<k>`; a single-address range keeps the
//! bare name.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::facts::MaddrMapping;
use crate::port;

const RANGES_KEY: &str = "ranges";
const NAMES_KEY: &str = "names";
const ENTRY_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = ',';

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read multicast name file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected 'key = value', found '{text}'")]
    Syntax { line: usize, text: String },

    #[error("line {line}: unknown key '{key}'")]
    UnknownKey { line: usize, key: String },

    #[error("line {line}: key '{key}' given twice")]
    DuplicateKey { line: usize, key: String },

    #[error("range entry '{entry}': {reason}")]
    InvalidRange { entry: String, reason: String },

    #[error("{ranges} ranges but {names} names")]
    NameCountMismatch { ranges: usize, names: usize },

    #[error("range {base}+{extent} runs past the multicast block 224.0.0.0/4")]
    RangeOverflow { base: Ipv4Addr, extent: u32 },
}

/// One `base-address,extent,port` entry paired with its base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaddrRange {
    pub base: Ipv4Addr,
    pub extent: u32,
    pub port: String,
    pub name: String,
}

impl MaddrRange {
    /// Expands the range into one mapping per address.
    pub fn expand(&self) -> Result<Vec<MaddrMapping>, ConfigError> {
        if self.extent == 0 {
            return Ok(Vec::new());
        }

        let start: u32 = self.base.into();
        let last: u32 = start
            .checked_add(self.extent - 1)
            .filter(|last| Ipv4Addr::from(*last).is_multicast())
            .ok_or(ConfigError::RangeOverflow {
                base: self.base,
                extent: self.extent,
            })?;

        if self.extent == 1 {
            return Ok(vec![MaddrMapping::new(self.base.to_string(), &self.name)]);
        }

        let mappings: Vec<MaddrMapping> = (start..=last)
            .enumerate()
            .map(|(k, addr)| {
                MaddrMapping::new(Ipv4Addr::from(addr).to_string(), format!("{}-{k}", self.name))
            })
            .collect();
        Ok(mappings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaddrTable {
    pub ranges: Vec<MaddrRange>,
}

impl MaddrTable {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text: String = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    /// Every address mapping, in file order.
    pub fn mappings(&self) -> Result<Vec<MaddrMapping>, ConfigError> {
        let mut mappings: Vec<MaddrMapping> = Vec::new();
        for range in &self.ranges {
            mappings.extend(range.expand()?);
        }
        Ok(mappings)
    }
}

impl FromStr for MaddrTable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ranges: Option<&str> = None;
        let mut names: Option<&str> = None;

        for (idx, raw_line) in s.lines().enumerate() {
            let line_no: usize = idx + 1;
            let line: &str = raw_line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Syntax {
                line: line_no,
                text: line.to_string(),
            })?;
            let key: &str = key.trim();

            let slot: &mut Option<&str> = match key {
                RANGES_KEY => &mut ranges,
                NAMES_KEY => &mut names,
                _ => {
                    return Err(ConfigError::UnknownKey {
                        line: line_no,
                        key: key.to_string(),
                    });
                }
            };
            if slot.replace(value.trim()).is_some() {
                return Err(ConfigError::DuplicateKey {
                    line: line_no,
                    key: key.to_string(),
                });
            }
        }

        let entries: Vec<&str> = split_list(ranges.unwrap_or_default());
        let names: Vec<&str> = split_list(names.unwrap_or_default());
        if entries.len() != names.len() {
            return Err(ConfigError::NameCountMismatch {
                ranges: entries.len(),
                names: names.len(),
            });
        }

        let ranges: Vec<MaddrRange> = entries
            .into_iter()
            .zip(names)
            .map(|(entry, name)| parse_range(entry, name))
            .collect::<Result<_, _>>()?;

        Ok(Self { ranges })
    }
}

fn split_list(value: &str) -> Vec<&str> {
    value
        .split(ENTRY_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_range(entry: &str, name: &str) -> Result<MaddrRange, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidRange {
        entry: entry.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = entry.split(FIELD_SEPARATOR).map(str::trim).collect();
    let [base, extent, port_name] = fields.as_slice() else {
        return Err(invalid("expected base-address,extent,port"));
    };

    let base: Ipv4Addr = base.parse().map_err(|_| invalid("bad base address"))?;
    if !base.is_multicast() {
        return Err(invalid("base address is not multicast"));
    }
    let extent: u32 = extent.parse().map_err(|_| invalid("bad extent"))?;
    if extent == 0 {
        return Err(invalid("extent must be at least 1"));
    }
    if port_name.is_empty() {
        return Err(invalid("missing port"));
    }

    Ok(MaddrRange {
        base,
        extent,
        port: port::normalize(port_name),
        name: name.to_string(),
    })
}
