//! [`DocumentParser`] backed by `scraper` (html5ever).
//!
//! html5ever recovers from any input, so parsing itself never errors; bodies
//! that are not valid UTF-8 are decoded lossily.

use scraper::{Html, Selector};
use tracing::warn;

use eddyweb_common::{
    document::{Document, DocumentParser},
    error::EnrichError,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl DocumentParser for HtmlParser {
    fn parse(&self, body: &[u8]) -> Result<Box<dyn Document>, EnrichError> {
        let text = String::from_utf8_lossy(body);
        Ok(Box::new(HtmlDocument(Html::parse_document(&text))))
    }
}

struct HtmlDocument(Html);

impl Document for HtmlDocument {
    fn select_attr(&self, selector: &str, attribute: &str) -> Option<String> {
        let selector: Selector = compile(selector)?;
        self.0
            .select(&selector)
            .find_map(|element| element.value().attr(attribute))
            .map(|value| value.trim().to_string())
    }

    fn select_text(&self, selector: &str) -> Option<String> {
        let selector: Selector = compile(selector)?;
        self.0
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
    }
}

fn compile(selector: &str) -> Option<Selector> {
    Selector::parse(selector)
        .map_err(|e| warn!("invalid selector '{selector}': {e}"))
        .ok()
}
