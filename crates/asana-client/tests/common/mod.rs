//! In-process fake of the Asana REST API.
//!
//! Binds an `axum` router on `127.0.0.1:0`, records every request it receives
//! and answers through a caller-supplied responder keyed on method and path
//! (the path has the `/api/1.0` prefix stripped).

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use tokio::task::JoinHandle;

use asana_client::{AsanaConfig, AsanaRestClient};

pub const TEST_TOKEN: &str = "0/test-personal-access-token";
const API_PREFIX: &str = "/api/1.0";

/// One request as seen by the fake server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }
}

type Responder = Arc<dyn Fn(&str, &str) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct FakeState {
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    responder: Responder,
}

pub struct FakeAsana {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: JoinHandle<()>,
}

impl FakeAsana {
    pub async fn start(
        responder: impl Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
    ) -> anyhow::Result<Self> {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            captured: Arc::clone(&captured),
            responder: Arc::new(responder),
        };
        let app = Router::new().fallback(capture).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}{API_PREFIX}"),
            captured,
            handle,
        })
    }

    /// Fake that answers every request with `status` and `body`.
    pub async fn fixed(status: u16, body: &'static str) -> anyhow::Result<Self> {
        Self::start(move |_, _| (status, body.to_string())).await
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }

    pub fn only_request(&self) -> CapturedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request: {requests:?}");
        requests.into_iter().next().unwrap()
    }

    pub fn client(&self) -> AsanaRestClient {
        let config = AsanaConfig {
            base_url: self.base_url.clone(),
            access_token: Some(TEST_TOKEN.to_string()),
            timeout_ms: 5_000,
            ..AsanaConfig::default()
        };
        AsanaRestClient::new(&config).expect("client should build")
    }
}

impl Drop for FakeAsana {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn capture(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or(uri.path())
        .to_string();
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.captured.lock().unwrap().push(CapturedRequest {
        method: method.to_string(),
        path: path.clone(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    });

    let (status, body) = (state.responder)(method.as_str(), &path);
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}
