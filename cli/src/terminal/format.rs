use colored::*;

use eddyweb_common::beacon::BeaconInfo;
use eddyweb_protocols::UrlFrame;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn beacon_to_details(info: &BeaconInfo) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(String::from("Url"), info.url.color(colors::URL))];

    if !info.description.is_empty() {
        details.push((String::from("About"), info.description.normal()));
    }

    if let Some(image) = &info.image_url {
        details.push((String::from("Image"), image.color(colors::URL)));
    }

    if info.is_fallback() {
        details.push((
            String::from("Note"),
            "page could not be loaded".color(colors::FALLBACK).italic(),
        ));
    }

    details
}

pub fn frame_to_details(frame: &UrlFrame) -> Vec<Detail> {
    vec![
        (String::from("Url"), frame.url.color(colors::URL)),
        (
            String::from("Tx"),
            format!("{} dBm @ 0m", frame.tx_power).normal(),
        ),
    ]
}

/// Parses hex such as `10eb03676f6f07`, `10 EB 03` or `0x10:0xeb:0x03`.
pub fn parse_hex(payload: &str) -> Result<Vec<u8>, String> {
    let digits: String = payload
        .split(|c: char| c.is_whitespace() || c == ':' || c == ',')
        .map(|chunk| chunk.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();

    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in '{payload}'"));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("invalid hex byte at offset {}", i / 2))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_hex_spellings() {
        let expected = vec![0x10, 0xEB, 0x03];
        assert_eq!(parse_hex("10eb03"), Ok(expected.clone()));
        assert_eq!(parse_hex("10 EB 03"), Ok(expected.clone()));
        assert_eq!(parse_hex("0x10:0xeb:0x03"), Ok(expected));
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(parse_hex("10e").is_err());
        assert!(parse_hex("zz").is_err());
        assert!(parse_hex("1é").is_err());
    }

    #[test]
    fn fallback_records_are_flagged() {
        let details = beacon_to_details(&BeaconInfo::fallback("https://x.com"));
        let keys: Vec<&str> = details.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["Url", "Note"]);
    }

    #[test]
    fn enriched_records_list_description_and_image() {
        let info = BeaconInfo {
            url: "https://x.com".into(),
            title: "X".into(),
            description: "About x".into(),
            image_url: Some("https://x.com/a.png".into()),
        };
        let keys: Vec<String> = beacon_to_details(&info).into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["Url", "About", "Image"]);
    }
}
