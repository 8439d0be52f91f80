use eddyweb_common::config::Config;
use eddyweb_protocols::eddystone;

use crate::terminal::{format, print};
use crate::tprint;

pub fn decode(payload: &str, cfg: &Config) -> anyhow::Result<()> {
    let bytes: Vec<u8> = format::parse_hex(payload).map_err(anyhow::Error::msg)?;

    let Some(frame) = eddystone::parse_url_frame(&bytes) else {
        anyhow::bail!("not an Eddystone-URL frame: {bytes:02X?}");
    };

    if cfg.json {
        let value = serde_json::json!({ "url": frame.url, "tx_power": frame.tx_power });
        println!("{value}");
        return Ok(());
    }

    match cfg.quiet {
        2 => tprint!(&frame.url),
        _ => {
            print::tree_head(0, "Eddystone-URL");
            print::as_tree_one_level(format::frame_to_details(&frame));
        }
    }
    Ok(())
}
