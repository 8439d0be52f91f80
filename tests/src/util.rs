#![cfg(test)]
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use eddyweb_common::beacon::RawAdvertisement;
use eddyweb_common::error::ScanError;
use eddyweb_common::scanning::ScanSource;
use eddyweb_core::html::HtmlParser;
use eddyweb_core::permissions::GrantedPermissions;
use eddyweb_common::transport::Transport;
use eddyweb_core::{MetadataFetcher, SessionController, SessionHandle};
use eddyweb_protocols::eddystone::FRAME_TYPE_URL;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A radio whose advertisements are pushed by the test.
#[derive(Default)]
pub struct ScriptedRadio {
    feed: Mutex<Option<mpsc::Sender<RawAdvertisement>>>,
}

impl ScriptedRadio {
    pub async fn broadcast(&self, service_data: &[u8]) {
        let feed = self.feed.lock().unwrap().clone();
        feed.expect("radio is not scanning")
            .send(RawAdvertisement::new(service_data))
            .await
            .unwrap();
    }
}

#[async_trait]
impl ScanSource for ScriptedRadio {
    async fn start_scan(
        &self,
        _window: Duration,
    ) -> Result<mpsc::Receiver<RawAdvertisement>, ScanError> {
        let (tx, rx) = mpsc::channel(64);
        *self.feed.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn stop_scan(&self) -> Result<(), ScanError> {
        self.feed.lock().unwrap().take();
        Ok(())
    }
}

pub fn pipeline(
    radio: Arc<ScriptedRadio>,
    transport: Arc<dyn Transport>,
    window: Duration,
) -> SessionHandle {
    let fetcher = Arc::new(MetadataFetcher::new(transport, Arc::new(HtmlParser)));
    SessionController::spawn(radio, Arc::new(GrantedPermissions::all()), fetcher, window)
}

/// Eddystone-URL service data with scheme `code` and raw `body` tokens.
pub fn url_frame(code: u8, body: &[u8]) -> Vec<u8> {
    let mut bytes = vec![FRAME_TYPE_URL, 0xEE, code];
    bytes.extend_from_slice(body);
    bytes
}

/// Serves one canned HTTP/1.1 response per request for `path -> (status, body)`.
///
/// Returns the base url, e.g. `http://127.0.0.1:41234`.
pub async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request.split_whitespace().nth(1).unwrap_or("/");

                let (status, body) = routes
                    .iter()
                    .find(|(route, _, _)| *route == path)
                    .map(|(_, status, body)| (*status, *body))
                    .unwrap_or((404, "<title>Not Found</title>"));

                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}
