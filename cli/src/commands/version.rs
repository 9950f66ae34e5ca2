use anyhow::Context;
use tracing::debug;

use crate::terminal::{print, spinner};
use mcastmap_common::config::Config;
use mcastmap_core::scraper::{self, ssh::SshConnector};

pub async fn version(cfg: &Config) -> anyhow::Result<()> {
    spinner::start(format!("Asking {} for its version...", cfg.addr));
    let result: anyhow::Result<Vec<String>> = fetch_version(cfg).await;
    spinner::finish();

    for line in result? {
        print::print(&line);
    }
    Ok(())
}

async fn fetch_version(cfg: &Config) -> anyhow::Result<Vec<String>> {
    let connector: SshConnector = SshConnector::connect(cfg)
        .await
        .with_context(|| format!("SSH connection to {} failed", cfg.addr))?;
    let lines: Vec<String> = scraper::fetch_version(&connector, cfg)
        .await
        .context("show version session failed")?;
    if let Err(e) = connector.close().await {
        debug!("closing ssh connection: {}", e);
    }
    Ok(lines)
}
