use crate::error::EnrichError;

/// A parsed page that can be queried with CSS selectors.
///
/// Returned strings are trimmed; `None` means no node matched.
pub trait Document {
    fn select_attr(&self, selector: &str, attribute: &str) -> Option<String>;

    fn select_text(&self, selector: &str) -> Option<String>;
}

pub trait DocumentParser: Send + Sync {
    fn parse(&self, body: &[u8]) -> Result<Box<dyn Document>, EnrichError>;
}
