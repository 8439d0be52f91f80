#![cfg(test)]
use eddyweb_common::error::EnrichError;
use eddyweb_common::transport::Transport;
use eddyweb_core::http::HttpTransport;

use crate::util::serve;

#[tokio::test]
async fn transport_reports_status_and_body() {
    let base = serve(vec![("/page", 200, "<title>t</title>")]).await;
    let transport = HttpTransport::new("eddyweb-integration").unwrap();

    let response = transport.fetch(&format!("{base}/page")).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.final_url, format!("{base}/page"));
    assert_eq!(response.body, b"<title>t</title>".to_vec());
}

#[tokio::test]
async fn transport_does_not_read_error_bodies() {
    let base = serve(vec![]).await;
    let transport = HttpTransport::new("eddyweb-integration").unwrap();

    let response = transport.fetch(&format!("{base}/missing")).await.unwrap();

    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn transport_errors_are_reported() {
    let transport = HttpTransport::new("eddyweb-integration").unwrap();
    let result = transport.fetch("http://").await;
    assert!(matches!(result, Err(EnrichError::Transport(_))));
}
