//! [`Transport`] backed by an async `reqwest` client.
//!
//! No timeout is configured here; requests use the client defaults.

use async_trait::async_trait;
use reqwest::Client;

use eddyweb_common::{
    error::EnrichError,
    transport::{HttpResponse, Transport},
};

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| EnrichError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<HttpResponse, EnrichError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EnrichError::Transport(e.to_string()))?;

        let status: u16 = response.status().as_u16();
        let final_url: String = response.url().to_string();

        // Error pages are never parsed.
        if !response.status().is_success() {
            return Ok(HttpResponse {
                status,
                final_url,
                body: Vec::new(),
            });
        }

        let body: Vec<u8> = response
            .bytes()
            .await
            .map_err(|e| EnrichError::Transport(format!("failed to read body: {e}")))?
            .to_vec();

        Ok(HttpResponse {
            status,
            final_url,
            body,
        })
    }
}
