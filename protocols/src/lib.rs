//! Wire formats understood by eddyweb.
//!
//! Everything in here is pure byte handling: no IO, no logging, no async.

pub mod eddystone;

pub use eddystone::{EDDYSTONE_SERVICE_UUID, UrlFrame, decode, parse_url_frame};
