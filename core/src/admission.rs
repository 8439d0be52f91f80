use std::collections::HashSet;

use eddyweb_common::beacon::DecodedUrl;

/// The set of URLs already admitted into enrichment during one session.
///
/// Insertion only. A new session gets a new filter.
#[derive(Debug, Default)]
pub struct AdmissionFilter {
    seen: HashSet<DecodedUrl>,
}

impl AdmissionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once per distinct `url`, recording it in the same step.
    pub fn admit(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_owned())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
