pub mod decode;
pub mod fetch;
pub mod scan;

use std::time::Duration;

use clap::{Parser, Subcommand};
use eddyweb_common::config::{Config, DEFAULT_SCAN_WINDOW, DEFAULT_USER_AGENT};

#[derive(Parser)]
#[command(name = "eddyweb")]
#[command(about = "Discover nearby Eddystone-URL beacons and preview the pages they point to.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output, repeat for less (-q, -qq)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// User agent used when fetching beacon pages
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan for beacons and fetch their page metadata
    #[command(alias = "s")]
    Scan {
        /// Discovery window in seconds
        #[arg(short, long, default_value_t = DEFAULT_SCAN_WINDOW.as_secs())]
        window: u64,

        /// Keep running: 'r' rescans, digits dismiss a result, 'q' quits
        #[arg(long)]
        watch: bool,
    },
    /// Decode a hex encoded Eddystone service data payload
    #[command(alias = "d")]
    Decode { payload: String },
    /// Fetch the metadata of a single URL
    #[command(alias = "f")]
    Fetch { url: String },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        let mut cfg = Config {
            user_agent: self.user_agent.clone(),
            quiet: self.quiet,
            json: self.json,
            ..Config::default()
        };
        if let Commands::Scan { window, watch } = self.command {
            cfg.scan_window = Duration::from_secs(window);
            cfg.watch = watch;
        }
        // JSON goes to stdout untouched by decorations.
        if cfg.json {
            cfg.quiet = cfg.quiet.max(1);
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_flags_reach_config() {
        let cli = CommandLine::parse_from(["eddyweb", "scan", "--window", "3", "--watch", "-qq"]);
        let cfg = cli.to_config();
        assert_eq!(cfg.scan_window, Duration::from_secs(3));
        assert!(cfg.watch);
        assert_eq!(cfg.quiet, 2);
    }

    #[test]
    fn scan_defaults_to_ten_seconds() {
        let cli = CommandLine::parse_from(["eddyweb", "s"]);
        assert_eq!(cli.to_config().scan_window, DEFAULT_SCAN_WINDOW);
    }

    #[test]
    fn json_implies_quiet() {
        let cli = CommandLine::parse_from(["eddyweb", "--json", "fetch", "https://example.com"]);
        let cfg = cli.to_config();
        assert!(cfg.json);
        assert_eq!(cfg.quiet, 1);
    }
}
