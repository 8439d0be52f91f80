use std::time::Duration;

/// Length of the discovery window of one scan session.
pub const DEFAULT_SCAN_WINDOW: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str = concat!("eddyweb/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Config {
    /// How long discovery runs before the radio is stopped.
    ///
    /// Enrichment of already admitted URLs is not bounded by this window.
    pub scan_window: Duration,
    /// Sent with every metadata fetch.
    pub user_agent: String,
    /// `0` prints everything, `1` drops decorations, `2` prints urls only.
    pub quiet: u8,
    /// Print results as JSON instead of a tree.
    pub json: bool,
    /// Keep the session alive for interactive rescans and dismissals.
    pub watch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_window: DEFAULT_SCAN_WINDOW,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            quiet: 0,
            json: false,
            watch: false,
        }
    }
}
