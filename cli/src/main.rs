mod commands;
mod terminal;

use commands::{CommandLine, Commands, decode, fetch, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = commands.to_config();

    logging::init_logging(cfg.quiet);
    print::banner(commands.no_banner, cfg.quiet);

    match commands.command {
        Commands::Scan { .. } => {
            print::header("scanning for beacons", cfg.quiet);
            scan::scan(&cfg).await
        }
        Commands::Decode { payload } => {
            print::header("eddystone frame", cfg.quiet);
            decode::decode(&payload, &cfg)
        }
        Commands::Fetch { url } => {
            print::header("page metadata", cfg.quiet);
            fetch::fetch(&url, &cfg).await
        }
    }
}
