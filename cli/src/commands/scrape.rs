use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::{debug, error};

use crate::{mprint, terminal::{colors, format, print, spinner}};
use mcastmap_common::config::{Config, MaddrTable};
use mcastmap_common::success;
use mcastmap_core::report::{self, PortReport};
use mcastmap_core::scraper::{self, ScrapeSummary, ssh::SshConnector};
use mcastmap_core::store::FactStore;

pub async fn scrape(maddr_file: Option<&Path>, cfg: &Config) -> anyhow::Result<()> {
    let store: FactStore = FactStore::new();

    if let Some(path) = maddr_file {
        let table: MaddrTable = MaddrTable::load(path)?;
        let inserted: usize = store
            .load_maddr_table(&table)
            .with_context(|| format!("expanding {}", path.display()))?;
        success!("Loaded {} multicast address names", inserted);
    }

    let start_time: Instant = Instant::now();
    spinner::start(format!("Connecting to {}...", cfg.addr));

    let connector: SshConnector = match SshConnector::connect(cfg).await {
        Ok(connector) => connector,
        Err(e) => {
            spinner::finish();
            return Err(e).with_context(|| format!("SSH connection to {} failed", cfg.addr));
        }
    };

    spinner::set_message(format!(
        "Scraping mroutes and {} LLDP ports...",
        cfg.lldp_ports.to_string().green().bold()
    ));
    let summary: ScrapeSummary = scraper::perform_scrape(&connector, &store, cfg).await;

    if let Err(e) = connector.close().await {
        debug!("closing ssh connection: {}", e);
    }
    spinner::finish();

    if let (Err(mroute), Err(lldp)) = (&summary.mroute.outcome, &summary.lldp.outcome) {
        anyhow::bail!("both scrapes failed (mroute: {mroute}; lldp: {lldp})");
    }
    for failed in [&summary.mroute, &summary.lldp] {
        if let Err(e) = &failed.outcome {
            error!("{} scrape aborted, report is partial: {}", failed.kind, e);
        }
    }

    let rows: Vec<PortReport> = report::build(&store);
    scrape_ends(&rows, &store, start_time.elapsed(), cfg);
    Ok(())
}

fn scrape_ends(rows: &[PortReport], store: &FactStore, total_time: Duration, cfg: &Config) {
    if rows.is_empty() {
        print::header("no subscriptions", cfg.quiet);
        print::no_results("No port forwards any multicast group");
        return;
    }

    print::header("multicast groups per port", cfg.quiet);
    print_ports(rows, cfg);
    print_summary(rows.len(), store, total_time, cfg);
}

fn print_ports(rows: &[PortReport], cfg: &Config) {
    for (idx, row) in rows.iter().enumerate() {
        match cfg.quiet {
            0 => {
                print::tree_head(idx, &row.port, format::neighbor_note(row));
                print::as_tree_one_level(&format::port_details(row));
                if idx + 1 != rows.len() {
                    mprint!();
                }
            }
            1 => print::print(&format::group_count_line(row)),
            _ => {}
        }
    }
}

fn print_summary(ports: usize, store: &FactStore, total_time: Duration, cfg: &Config) {
    let ports: ColoredString = format!("{ports} ports").bold().green();
    let groups: ColoredString = format!("{} subscriptions", store.subscription_count())
        .bold()
        .color(colors::GROUP_ADDR);
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString = format!("Scrape Complete: {groups} on {ports} in {total_time}")
        .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => success!("{}", output),
    }
}
