//! **Eddystone-URL** frame decoding.
//!
//! An Eddystone beacon advertises its payload as BLE service data under the
//! 16-bit service `0xFEAA`. A URL frame is laid out as:
//!
//! ```text
//! +------------+----------+--------+---------------------------+
//! | frame type | tx power | scheme | encoded url (0..17 bytes) |
//! |   0x10     |   i8     |  code  |  tokens                   |
//! +------------+----------+--------+---------------------------+
//! ```
//!
//! The encoded url is a stream of tokens. A token is either one of the eight
//! reserved expansion codes (`0x00..=0x07`) or a literal ASCII character.
//!
//! Decoding is deliberately lenient: an unknown scheme code expands to nothing
//! and every non-reserved byte is taken literally, so no byte value is invalid.
//! Bytes above `0x7F` are read as the Latin-1 character of the same code point
//! and so take two bytes in the decoded UTF-8 string.

use uuid::Uuid;

/// Bluetooth base UUID form of the Eddystone 16-bit service identifier `0xFEAA`.
pub const EDDYSTONE_SERVICE_UUID: Uuid = Uuid::from_u128(0x0000FEAA_0000_1000_8000_00805F9B34FB);

pub const FRAME_TYPE_URL: u8 = 0x10;

const HEADER_LEN: usize = 2;

const SCHEME_PREFIXES: [&str; 4] = ["http://www.", "https://www.", "http://", "https://"];

const EXPANSIONS: [&str; 8] = [
    ".com/", ".org/", ".edu/", ".net/", ".info/", ".biz/", ".gov/", ".com",
];

/// A decoded URL frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFrame {
    /// Calibrated transmit power at 0 m, in dBm.
    pub tx_power: i8,
    pub url: String,
}

/// Decodes Eddystone service data into the advertised URL.
///
/// Returns `None` for empty payloads, frames of any other type and URL frames
/// truncated before their scheme byte.
pub fn decode(service_data: &[u8]) -> Option<String> {
    parse_url_frame(service_data).map(|frame| frame.url)
}

/// Like [`decode`], but keeps the frame's transmit power.
pub fn parse_url_frame(service_data: &[u8]) -> Option<UrlFrame> {
    let (&frame_type, rest) = service_data.split_first()?;
    if frame_type != FRAME_TYPE_URL {
        return None;
    }

    let (&tx_power, _) = rest.split_first()?;
    let (&scheme, tokens) = service_data.get(HEADER_LEN..)?.split_first()?;

    let mut url: String = String::from(scheme_prefix(scheme));
    for &token in tokens {
        match expansion(token) {
            Some(suffix) => url.push_str(suffix),
            None => url.push(char::from(token)),
        }
    }

    Some(UrlFrame {
        tx_power: tx_power as i8,
        url,
    })
}

fn scheme_prefix(code: u8) -> &'static str {
    SCHEME_PREFIXES.get(code as usize).copied().unwrap_or("")
}

fn expansion(code: u8) -> Option<&'static str> {
    EXPANSIONS.get(code as usize).copied()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
