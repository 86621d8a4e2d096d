//! Mock client endpoint for integration tests
//!
//! Implements the request/response contract the checker verifies, with
//! switchable misbehaviours so failure reporting can be exercised too

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Largest body accepted before answering 431
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// How the mock deviates from the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Follows the contract exactly
    Conforming,
    /// Puts the wrong marker in `Adi`
    WrongMarker,
    /// Answers every request with 500
    ServerError,
    /// Answers valid requests with 200 and a non-JSON body
    MalformedBody,
    /// Accepts any content type
    IgnoresContentType,
    /// Adds the number of earlier requests to `Age`, so only the first answer is right
    DriftingAge,
    /// Sleeps before answering
    Slow(Duration),
}

/// Mock endpoint on a random local port, shut down on drop
pub struct MockEndpoint {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    behavior: Behavior,
    request_count: AtomicU32,
    last_headers: Mutex<Option<HeaderMap>>,
}

impl MockEndpoint {
    /// Start a conforming mock, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Behavior::Conforming).await
    }

    /// Start a mock with the given behavior
    pub async fn start_with(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            request_count: AtomicU32::new(0),
            last_headers: Mutex::new(None),
        });

        let app = Router::new()
            .route("/client", routing::post(handle_client))
            .route("/api/client", routing::post(handle_client))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL to configure as the target
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests received on any route
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Value of a header on the most recent request
    pub fn last_header(&self, name: &str) -> Option<String> {
        self.state
            .last_headers
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|headers| headers.get(name))
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned)
    }
}

impl Drop for MockEndpoint {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// An address nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// -- Wire types --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClientRequest {
    #[serde(rename = "Id")]
    id: i32,
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Serialize)]
struct ClientResponse {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Age")]
    age: i32,
    #[serde(rename = "Adi")]
    adi: String,
}

// -- Handler --

async fn handle_client(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    let count = state.request_count.fetch_add(1, Ordering::Relaxed) + 1;
    *state.last_headers.lock().unwrap() = Some(headers.clone());

    match state.behavior {
        Behavior::ServerError => {
            return problem(StatusCode::INTERNAL_SERVER_ERROR, "mock server intentional failure");
        }
        Behavior::Slow(delay) => tokio::time::sleep(delay).await,
        _ => {}
    }

    if state.behavior != Behavior::IgnoresContentType && !is_json(&headers) {
        return problem(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type");
    }

    if body.len() > MAX_BODY_BYTES {
        return problem(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE, "Request field too large");
    }

    let request: ClientRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return problem(StatusCode::BAD_REQUEST, &format!("One or more validation errors occurred: {e}")),
    };

    if state.behavior == Behavior::MalformedBody {
        return (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], "{\"Name\":").into_response();
    }

    let age = match state.behavior {
        Behavior::DriftingAge => request.id.saturating_add(i32::try_from(count - 1).unwrap_or(i32::MAX)),
        _ => request.id,
    };

    let adi = match state.behavior {
        Behavior::WrongMarker => "additional_info",
        _ => "addition_info",
    };

    Json(ClientResponse {
        name: request.name,
        age,
        adi: adi.to_owned(),
    })
    .into_response()
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
}

fn problem(status: StatusCode, title: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "title": title,
            "status": status.as_u16(),
        })),
    )
        .into_response()
}
