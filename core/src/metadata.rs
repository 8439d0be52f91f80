//! Turns a beacon URL into a [`BeaconInfo`].
//!
//! One fetch, no retries. Whatever goes wrong (transport, status, document)
//! collapses into [`BeaconInfo::fallback`], so callers always get a record.

use std::sync::Arc;

use reqwest::Url;
use tracing::{debug, warn};

use eddyweb_common::{
    beacon::BeaconInfo,
    document::{Document, DocumentParser},
    error::EnrichError,
    transport::{HttpResponse, Transport},
};

const OG_TITLE: &str = r#"meta[property="og:title"]"#;
const OG_DESCRIPTION: &str = r#"meta[property="og:description"]"#;
const OG_IMAGE: &str = r#"meta[property="og:image"]"#;
const META_DESCRIPTION: &str = r#"meta[name="description"]"#;
const TITLE: &str = "title";
const CONTENT: &str = "content";

pub struct MetadataFetcher {
    transport: Arc<dyn Transport>,
    parser: Arc<dyn DocumentParser>,
}

impl MetadataFetcher {
    pub fn new(transport: Arc<dyn Transport>, parser: Arc<dyn DocumentParser>) -> Self {
        Self { transport, parser }
    }

    /// Fetches `url` and extracts its metadata. Never fails.
    pub async fn enrich(&self, url: &str) -> BeaconInfo {
        match self.try_enrich(url).await {
            Ok(info) => {
                debug!(%url, title = %info.title, "enriched");
                info
            }
            Err(e) => {
                warn!(%url, "falling back to url: {e}");
                BeaconInfo::fallback(url)
            }
        }
    }

    async fn try_enrich(&self, url: &str) -> Result<BeaconInfo, EnrichError> {
        let response: HttpResponse = self.transport.fetch(url).await?;
        if !response.is_success() {
            return Err(EnrichError::Status(response.status));
        }
        self.extract(url, &response)
    }

    fn extract(&self, url: &str, response: &HttpResponse) -> Result<BeaconInfo, EnrichError> {
        let document: Box<dyn Document> = self.parser.parse(&response.body)?;

        let title: String = first_non_empty([
            document.select_attr(OG_TITLE, CONTENT),
            document.select_text(TITLE),
        ])
        .unwrap_or_else(|| url.to_string());

        let description: String = first_non_empty([
            document.select_attr(OG_DESCRIPTION, CONTENT),
            document.select_attr(META_DESCRIPTION, CONTENT),
        ])
        .unwrap_or_default();

        let image_url: Option<String> = document
            .select_attr(OG_IMAGE, CONTENT)
            .filter(|image| !image.is_empty())
            .map(|image| resolve(&response.final_url, image));

        Ok(BeaconInfo {
            url: url.to_string(),
            title,
            description,
            image_url,
        })
    }
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|candidate| candidate.trim().to_string())
        .find(|candidate| !candidate.is_empty())
}

/// Resolves a possibly relative image reference against the page it came from.
fn resolve(page_url: &str, image: String) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(&image))
        .map(String::from)
        .unwrap_or(image)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
