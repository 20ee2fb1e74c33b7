#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    Router,
    http::{StatusCode, header},
    routing::get,
};
use revocation_check::{
    adapters::HttpListFetcher, config::Config, domain::revocation::RevocationChecker,
    server::Server,
};

pub const REVOKED_DER: &[u8] = include_bytes!("../../test_data/revoked.crl");
pub const REVOKED_PEM: &str = include_str!("../../test_data/revoked.pem");
pub const EMPTY_DER: &[u8] = include_bytes!("../../test_data/empty.crl");

// Helper function to spawn a test server on a random port
pub async fn spawn_server() -> String {
    let config = {
        // Explicit empty overrides keep APP_* variables out of the tests
        let mut config = Config::load_with_sources(Some(HashMap::new())).unwrap();
        config.server.host = "127.0.0.1".to_string();
        // Use a random OS port
        config.server.port = 0;
        config
    };

    let fetcher = HttpListFetcher::new(&config.service.name, &config.fetch).unwrap();
    let server = Server::new(RevocationChecker::new(fetcher), &config).unwrap();

    let port = server.port().unwrap();
    tokio::spawn(async move {
        server.run().await.expect("failed to run server");
    });

    format!("http://127.0.0.1:{port}")
}

/// Serves the fixture lists the checker is pointed at
pub async fn spawn_list_host() -> String {
    let app = Router::new()
        .route(
            "/crl/revoked.crl",
            get(|| async { ([(header::CONTENT_TYPE, "application/pkix-crl")], REVOKED_DER) }),
        )
        .route(
            "/crl/revoked.pem",
            get(|| async { ([(header::CONTENT_TYPE, "text/plain")], REVOKED_PEM) }),
        )
        .route(
            "/crl/latest",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/octet-stream")],
                    REVOKED_DER,
                )
            }),
        )
        .route(
            "/crl/empty.crl",
            get(|| async { ([(header::CONTENT_TYPE, "application/x-x509-crl")], EMPTY_DER) }),
        )
        .route(
            "/crl/truncated.crl",
            get(|| async { ([(header::CONTENT_TYPE, "application/pkix-crl")], &REVOKED_DER[..3]) }),
        )
        .route(
            "/lists/revoked.json",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/json")],
                    r#"["A1B2", {"serial": "C3D4"}]"#,
                )
            }),
        )
        .route(
            "/lists/revoked.txt",
            get(|| async { ([(header::CONTENT_TYPE, "text/plain")], "A1B2\nC3D4\n") }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}
