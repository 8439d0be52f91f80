use serde::Serialize;

/// A fully reconstructed address decoded from an Eddystone-URL frame.
pub type DecodedUrl = String;

/// Eddystone service data observed for one device during one scan tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAdvertisement {
    pub service_data: Vec<u8>,
}

impl RawAdvertisement {
    pub fn new(service_data: impl Into<Vec<u8>>) -> Self {
        Self {
            service_data: service_data.into(),
        }
    }
}

/// Human readable metadata for one beacon URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeaconInfo {
    pub url: DecodedUrl,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl BeaconInfo {
    /// The degraded record used whenever a page cannot be enriched.
    pub fn fallback(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: url.to_string(),
            description: String::new(),
            image_url: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.title == self.url && self.description.is_empty() && self.image_url.is_none()
    }
}
