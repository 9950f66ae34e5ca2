use std::path::Path;

use colored::*;

use crate::{mprint, terminal::{colors, print}};
use mcastmap_common::config::{Config, MaddrTable};
use mcastmap_common::facts::MaddrMapping;
use mcastmap_common::success;

pub fn maddr(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    let table: MaddrTable = MaddrTable::load(path)?;

    let mut total: usize = 0;
    for (idx, range) in table.ranges.iter().enumerate() {
        let mappings: Vec<MaddrMapping> = range.expand()?;
        total += mappings.len();

        if cfg.quiet > 0 {
            continue;
        }

        let note: ColoredString = format!("on {}", range.port).color(colors::NEIGHBOR);
        print::tree_head(idx, &range.name, note);
        let details: Vec<(String, ColoredString)> = mappings
            .into_iter()
            .map(|mapping| (mapping.address, mapping.name.color(colors::GROUP_ADDR)))
            .collect();
        print::as_tree_one_level(&details);
        if idx + 1 != table.ranges.len() {
            mprint!();
        }
    }

    success!(
        "{} ranges define {} multicast names",
        table.ranges.len(),
        total
    );
    Ok(())
}
