use axum::Json;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use serde_json::Value;
use tracing::debug;
use url::form_urlencoded;

use crate::domain::revocation::{CheckResult, ListFetcher};
use crate::server::AppState;
use crate::server::errors::AppError;

/// Accepted body keys, first non-empty string wins
const SERIAL_KEYS: [&str; 2] = ["serial", "certSerial"];
const LIST_URL_KEYS: [&str; 3] = ["listUrl", "crlUrl", "list_url"];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckQuery {
    pub serial: Option<String>,
    pub list_url: Option<String>,
}

impl CheckQuery {
    /// Reads `serial` and `listUrl`; a repeated key keeps its first value
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "serial" => &mut parsed.serial,
                "listUrl" => &mut parsed.list_url,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        parsed
    }
}

pub async fn check_get<F: ListFetcher>(
    State(state): State<AppState<F>>,
    RawQuery(query): RawQuery,
) -> Json<CheckResult> {
    let query = CheckQuery::parse(query.as_deref().unwrap_or_default());
    let result = state
        .checker
        .check(query.serial.as_deref(), query.list_url.as_deref())
        .await;
    Json(result)
}

/// POST variant. The body is read raw so that bad JSON maps to our own 400 shape
/// instead of the extractor's rejection.
pub async fn check_post<F: ListFetcher>(
    State(state): State<AppState<F>>,
    body: Bytes,
) -> Result<Json<CheckResult>, AppError> {
    let document: Value = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejecting check body: {e}");
        AppError::InvalidJsonBody
    })?;

    let serial = first_string(&document, &SERIAL_KEYS);
    let list_url = first_string(&document, &LIST_URL_KEYS);
    Ok(Json(state.checker.check(serial, list_url).await))
}

/// Non-string and empty values count as absent
fn first_string<'a>(document: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        document
            .get(*key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::{Router, response::Response};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::revocation::{FetchError, FetchedList, RevocationChecker};

    const LIST_URL: &str = "http://lists.test/revoked.json";

    #[derive(Default)]
    struct RecordingFetcher {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ListFetcher for RecordingFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedList, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(FetchedList::new(
                200,
                Some("application/json"),
                r#"{"revoked": ["A1B2", {"serial": "C3D4"}]}"#,
            ))
        }
    }

    fn app() -> (Router, AppState<RecordingFetcher>) {
        let state = AppState::new(
            RevocationChecker::new(RecordingFetcher::default()),
            "revocation-check",
        );
        let router = Router::new()
            .route(
                "/check",
                get(check_get::<RecordingFetcher>).post(check_post::<RecordingFetcher>),
            )
            .with_state(state.clone());
        (router, state)
    }

    async fn json_of(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(body: &str) -> Request<Body> {
        Request::post("/check")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_query() {
        let (router, state) = app();
        let request = Request::get(format!("/check?serial=c3d4&listUrl={LIST_URL}"))
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await, json!({"revoked": true, "serial": "C3D4"}));
        assert_eq!(*state.checker.fetcher().requested.lock().unwrap(), vec![LIST_URL]);
    }

    #[tokio::test]
    async fn test_get_repeated_params_keep_first() {
        let (router, state) = app();
        let request = Request::get(format!(
            "/check?serial=c3d4&serial=ffff&listUrl={LIST_URL}&listUrl=http://other.test/x"
        ))
        .body(Body::empty())
        .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await, json!({"revoked": true, "serial": "C3D4"}));
        assert_eq!(*state.checker.fetcher().requested.lock().unwrap(), vec![LIST_URL]);
    }

    #[tokio::test]
    async fn test_get_without_query() {
        let (router, _) = app();
        let request = Request::get("/check").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_of(response).await,
            json!({"revoked": false, "serial": "", "error": "missing or invalid serial"})
        );
    }

    #[test]
    fn test_query_parse() {
        assert_eq!(
            CheckQuery::parse("serial=00%3AFF&listUrl=http%3A%2F%2Fh%2Fl.crl%3Fa%3D1&x=y"),
            CheckQuery {
                serial: Some("00:FF".into()),
                list_url: Some("http://h/l.crl?a=1".into()),
            }
        );
        assert_eq!(CheckQuery::parse(""), CheckQuery::default());
        assert_eq!(
            CheckQuery::parse("serial=&serial=01").serial.as_deref(),
            Some("")
        );
    }

    #[tokio::test]
    async fn test_get_missing_params() {
        let (router, state) = app();
        let request = Request::get("/check?serial=A1B2").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_of(response).await,
            json!({"revoked": false, "serial": "A1B2", "error": "missing listUrl"})
        );
        assert!(state.checker.fetcher().requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_key_aliases() {
        let bodies = [
            json!({"serial": "a1b2", "listUrl": LIST_URL}),
            json!({"certSerial": "a1b2", "crlUrl": LIST_URL}),
            json!({"serial": "", "certSerial": "a1b2", "list_url": LIST_URL}),
        ];
        for body in bodies {
            let (router, _) = app();
            let response = router.oneshot(post(&body.to_string())).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                json_of(response).await,
                json!({"revoked": true, "serial": "A1B2"}),
                "body {body}"
            );
        }
    }

    #[tokio::test]
    async fn test_post_non_string_values_are_missing() {
        let (router, _) = app();
        let body = json!({"serial": 42, "listUrl": LIST_URL}).to_string();
        let response = router.oneshot(post(&body)).await.unwrap();
        assert_eq!(
            json_of(response).await["error"],
            json!("missing or invalid serial")
        );

        let (router, _) = app();
        let body = json!({"serial": "A1B2", "listUrl": ["http://x"]}).to_string();
        let response = router.oneshot(post(&body)).await.unwrap();
        assert_eq!(json_of(response).await["error"], json!("missing listUrl"));
    }

    #[tokio::test]
    async fn test_post_non_object_body() {
        let (router, _) = app();
        let response = router.oneshot(post("[1, 2]")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_of(response).await["error"],
            json!("missing or invalid serial")
        );
    }

    #[tokio::test]
    async fn test_post_malformed_json() {
        for body in ["{serial:", ""] {
            let (router, state) = app();
            let response = router.oneshot(post(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_of(response).await,
                json!({"revoked": false, "error": "invalid JSON body"})
            );
            assert!(state.checker.fetcher().requested.lock().unwrap().is_empty());
        }
    }

    #[test]
    fn test_first_string() {
        let document = json!({"a": "", "b": 3, "c": "x", "d": "y"});
        assert_eq!(first_string(&document, &["a", "b", "c", "d"]), Some("x"));
        assert_eq!(first_string(&document, &["z"]), None);
        assert_eq!(first_string(&json!("c"), &["c"]), None);
    }
}
