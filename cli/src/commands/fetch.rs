use std::sync::Arc;

use eddyweb_common::{beacon::BeaconInfo, config::Config};
use eddyweb_core::{MetadataFetcher, html::HtmlParser, http::HttpTransport};

use super::scan::print_beacons;

pub async fn fetch(url: &str, cfg: &Config) -> anyhow::Result<()> {
    let transport = Arc::new(HttpTransport::new(&cfg.user_agent)?);
    let fetcher = MetadataFetcher::new(transport, Arc::new(HtmlParser));

    let info: BeaconInfo = fetcher.enrich(url).await;

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    print_beacons(std::slice::from_ref(&info), cfg);
    Ok(())
}
