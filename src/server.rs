pub mod errors;
pub mod handlers;
pub mod responses;

use std::net::TcpListener;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use axum_server::tls_rustls::RustlsConfig;
use color_eyre::eyre::{Context, Result, eyre};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::{Config, TlsConfig};
use crate::domain::revocation::{ListFetcher, RevocationChecker};
use handlers::{check, health};

pub const CHECK_PATH: &str = "/api/revocation/check";

/// Headers attached to every response, preflight or not
const CORS_HEADERS: [(HeaderName, &str); 4] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
    (header::ACCESS_CONTROL_MAX_AGE, "86400"),
];

#[derive(Debug)]
pub struct AppState<F> {
    pub checker: Arc<RevocationChecker<F>>,
    pub service_name: Arc<str>,
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            checker: Arc::clone(&self.checker),
            service_name: Arc::clone(&self.service_name),
        }
    }
}

impl<F: ListFetcher> AppState<F> {
    pub fn new(checker: RevocationChecker<F>, service_name: impl Into<Arc<str>>) -> Self {
        Self {
            checker: Arc::new(checker),
            service_name: service_name.into(),
        }
    }
}

/// Builds the HTTP surface with CORS, preflight handling and request tracing
pub fn router<F: ListFetcher>(state: AppState<F>) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &'_ axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("request", method = %request.method(), uri)
        });

    let mut router = Router::new()
        .route("/", get(health::health_check::<F>))
        .route("/api/health", get(health::health_check::<F>))
        .route(
            CHECK_PATH,
            get(check::check_get::<F>)
                .post(check::check_post::<F>)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(preflight));

    for (name, value) in CORS_HEADERS {
        router = router.layer(SetResponseHeaderLayer::overriding(
            name,
            HeaderValue::from_static(value),
        ));
    }

    router.layer(trace_layer).with_state(state)
}

/// Answers every `OPTIONS` request with an empty 204
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}

pub struct Server {
    router: Router,
    listener: TcpListener,
    tls: Option<TlsConfig>,
}

impl Server {
    /// Binds the listener right away so that `port()` is known before `run()`
    pub fn new<F: ListFetcher>(checker: RevocationChecker<F>, config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr)
            .with_context(|| format!("Binding TCP listener on {addr}"))?;
        listener
            .set_nonblocking(true)
            .context("Setting non-blocking mode")?;

        let state = AppState::new(checker, config.service.name.as_str());
        Ok(Self {
            router: router(state),
            listener,
            tls: config.server.tls.clone(),
        })
    }

    pub fn port(&self) -> Result<u16> {
        Ok(self
            .listener
            .local_addr()
            .context("Getting local address")?
            .port())
    }

    pub async fn run(self) -> Result<()> {
        let port = self.port()?;
        let app = self.router.into_make_service();

        match self.tls {
            Some(tls) => {
                let rustls_config = load_tls_config(&tls).await?;
                tracing::info!("Server listening on https://0.0.0.0:{port}");
                axum_server::from_tcp_rustls(self.listener, rustls_config)
                    .serve(app)
                    .await
                    .context("Serving HTTPS")?;
            }
            None => {
                tracing::info!("Server listening on http://0.0.0.0:{port}");
                axum_server::from_tcp(self.listener)
                    .serve(app)
                    .await
                    .context("Serving HTTP")?;
            }
        }
        Ok(())
    }
}

async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig> {
    // Both ring and aws-lc-rs end up linked, so the process default must be chosen
    let _ = rustls::crypto::ring::default_provider().install_default();

    tracing::debug!(cert = %tls.cert_path, key = %tls.key_path, "Loading TLS material");
    RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| eyre!("Failed to load TLS certificate or key: {e}"))
}
