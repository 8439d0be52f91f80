#![cfg(test)]
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eddyweb_common::beacon::BeaconInfo;
use eddyweb_common::error::EnrichError;
use eddyweb_common::session::SessionStatus;
use eddyweb_common::transport::{HttpResponse, Transport};
use eddyweb_core::http::HttpTransport;
use eddyweb_protocols::eddystone;

use crate::util::{ScriptedRadio, pipeline, serve, url_frame};

const MUSEUM: &str = r#"<html><head>
    <title>City Museum</title>
    <meta property="og:title" content="City Museum · Hall A">
    <meta name="description" content="  Dinosaurs and minerals  ">
    <meta property="og:image" content="/static/hall-a.jpg">
</head><body><h1>Welcome</h1></body></html>"#;

const CAFE: &str = "<html><head><title>\n  Corner Cafe\n</title></head></html>";

fn transport() -> Arc<HttpTransport> {
    Arc::new(HttpTransport::new("eddyweb-integration").unwrap())
}

/// `http://127.0.0.1:<port><path>` as an Eddystone frame body, scheme `0x02`.
fn local_frame(base: &str, path: &str) -> Vec<u8> {
    let address = base.trim_start_matches("http://");
    url_frame(0x02, format!("{address}{path}").as_bytes())
}

#[tokio::test]
async fn beacons_are_decoded_deduplicated_and_enriched() {
    let base = serve(vec![("/museum", 200, MUSEUM), ("/cafe", 200, CAFE)]).await;
    let radio = Arc::new(ScriptedRadio::default());
    let handle = pipeline(radio.clone(), transport(), Duration::from_secs(3600));

    assert_eq!(
        eddystone::decode(&local_frame(&base, "/museum")),
        Some(format!("{base}/museum"))
    );

    handle.start().await.unwrap();

    radio.broadcast(&local_frame(&base, "/museum")).await;
    radio.broadcast(&[0x00, 0xEE, 0x01, 0x02, 0x03]).await;
    radio.broadcast(&local_frame(&base, "/museum")).await;
    radio.broadcast(&local_frame(&base, "/cafe")).await;
    radio.broadcast(&[]).await;
    radio.broadcast(&local_frame(&base, "/cafe")).await;

    handle.wait_for(|s| s.results.len() == 2).await.unwrap();
    handle.stop().await.unwrap();
    let snapshot = handle.wait_until_settled().await.unwrap();

    assert_eq!(snapshot.results.len(), 2);

    let museum = snapshot
        .results
        .iter()
        .find(|info| info.url.ends_with("/museum"))
        .expect("museum beacon missing");
    assert_eq!(
        museum,
        &BeaconInfo {
            url: format!("{base}/museum"),
            title: "City Museum · Hall A".into(),
            description: "Dinosaurs and minerals".into(),
            image_url: Some(format!("{base}/static/hall-a.jpg")),
        }
    );

    let cafe = snapshot
        .results
        .iter()
        .find(|info| info.url.ends_with("/cafe"))
        .expect("cafe beacon missing");
    assert_eq!(cafe.title, "Corner Cafe");
    assert_eq!(cafe.description, "");
    assert_eq!(cafe.image_url, None);
}

#[tokio::test]
async fn missing_pages_fall_back_to_their_url() {
    let base = serve(vec![("/gone", 410, "<title>Gone</title>")]).await;
    let radio = Arc::new(ScriptedRadio::default());
    let handle = pipeline(radio.clone(), transport(), Duration::from_secs(3600));

    handle.start().await.unwrap();
    radio.broadcast(&local_frame(&base, "/gone")).await;
    radio.broadcast(&local_frame(&base, "/unknown")).await;

    let snapshot = handle.wait_for(|s| s.results.len() == 2).await.unwrap();

    for info in &snapshot.results {
        assert_eq!(info, &BeaconInfo::fallback(&info.url));
    }
}

#[tokio::test]
async fn unreachable_host_falls_back_to_its_url() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed = format!("127.0.0.1:{}/", listener.local_addr().unwrap().port());
    drop(listener);

    let radio = Arc::new(ScriptedRadio::default());
    let handle = pipeline(radio.clone(), transport(), Duration::from_secs(3600));

    handle.start().await.unwrap();
    radio.broadcast(&url_frame(0x02, closed.as_bytes())).await;

    let snapshot = handle.wait_for(|s| s.results.len() == 1).await.unwrap();
    assert_eq!(
        snapshot.results[0],
        BeaconInfo::fallback(&format!("http://{closed}"))
    );
}

#[tokio::test]
async fn dismissed_beacon_stays_dismissed_for_the_session() {
    let base = serve(vec![("/museum", 200, MUSEUM), ("/cafe", 200, CAFE)]).await;
    let radio = Arc::new(ScriptedRadio::default());
    let handle = pipeline(radio.clone(), transport(), Duration::from_secs(3600));

    handle.start().await.unwrap();
    radio.broadcast(&local_frame(&base, "/museum")).await;
    handle.wait_for(|s| s.results.len() == 1).await.unwrap();

    assert!(handle.dismiss(0).await.unwrap());
    radio.broadcast(&local_frame(&base, "/museum")).await;
    radio.broadcast(&local_frame(&base, "/cafe")).await;

    let snapshot = handle.wait_for(|s| s.results.len() == 1).await.unwrap();
    assert!(snapshot.results[0].url.ends_with("/cafe"));
    assert_eq!(snapshot.pending, 0);

    handle.start().await.unwrap();
    radio.broadcast(&local_frame(&base, "/museum")).await;
    let snapshot = handle
        .wait_for(|s| s.generation == 2 && s.results.len() == 1)
        .await
        .unwrap();
    assert!(snapshot.results[0].url.ends_with("/museum"));
}

/// Answers every request from memory so paused time never waits on a socket.
struct CannedPage(&'static str);

#[async_trait]
impl Transport for CannedPage {
    async fn fetch(&self, url: &str) -> Result<HttpResponse, EnrichError> {
        Ok(HttpResponse {
            status: 200,
            final_url: url.to_string(),
            body: self.0.as_bytes().to_vec(),
        })
    }
}

#[tokio::test(start_paused = true)]
async fn session_returns_to_idle_after_the_window() {
    let radio = Arc::new(ScriptedRadio::default());
    let handle = pipeline(radio.clone(), Arc::new(CannedPage(CAFE)), Duration::from_secs(10));

    handle.start().await.unwrap();
    assert_eq!(handle.snapshot().status, SessionStatus::Scanning);
    radio.broadcast(&url_frame(0x03, b"cafe\x07")).await;

    let snapshot = handle.wait_until_settled().await.unwrap();
    assert_eq!(snapshot.status, SessionStatus::Idle);
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(snapshot.results[0].url, "https://cafe.com");
    assert_eq!(snapshot.results[0].title, "Corner Cafe");

    handle.shutdown().await;
}
