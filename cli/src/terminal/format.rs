use colored::*;

use mcastmap_core::report::{GroupEntry, PortReport};

use crate::terminal::colors;

type Detail = (String, ColoredString);

pub fn group_to_detail(entry: &GroupEntry) -> Detail {
    let value: ColoredString = match &entry.name {
        Some(name) => format!("{} ({})", entry.group, name).color(colors::GROUP_ADDR),
        None => entry.group.color(colors::GROUP_ADDR),
    };
    (String::from("Group"), value)
}

pub fn port_details(report: &PortReport) -> Vec<Detail> {
    report.groups.iter().map(group_to_detail).collect()
}

pub fn neighbor_note(report: &PortReport) -> ColoredString {
    let label: String = format!("({})", report.neighbor_label());
    match report.neighbor {
        Some(_) => label.color(colors::NEIGHBOR),
        None => label.dimmed(),
    }
}

pub fn group_count_line(report: &PortReport) -> String {
    let noun: &str = if report.group_count == 1 { "group" } else { "groups" };
    format!(
        "Port {} ({}) wants {} mcast {}",
        report.port,
        report.neighbor_label(),
        report.group_count,
        noun
    )
}
