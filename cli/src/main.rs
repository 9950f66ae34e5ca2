mod commands;
mod terminal;

use commands::{CommandLine, Commands, maddr, scrape, version};
use mcastmap_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    let cfg: Config = commands.to_config();
    print::banner(cfg.no_banner, cfg.quiet);

    match commands.command {
        Commands::Scrape { maddr_file, .. } => {
            print::header("scraping switch", cfg.quiet);
            scrape::scrape(maddr_file.as_deref(), &cfg).await
        }
        Commands::Version => {
            print::header("switch version", cfg.quiet);
            version::version(&cfg).await
        }
        Commands::Maddr { maddr_file } => {
            print::header("multicast names", cfg.quiet);
            maddr::maddr(&maddr_file, &cfg)
        }
    }
}
