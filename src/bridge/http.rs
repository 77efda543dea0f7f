//! HTTP transport for the bridge — JSON-framed call envelopes over axum.
//!
//! Requires the `http` feature.
//!
//! ## Routes
//!
//! - `POST /invoke` — dispatch a single call envelope.
//! - `POST /batch` — dispatch a sequence of envelopes; all-or-nothing response.
//! - `GET /health` — health check returning `{ "ok": true, "resources": [...] }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use optibridge::{InMemoryAccessor, QueryBridge};
//!
//! let bridge = Arc::new(
//!     QueryBridge::new().resource("employees", InMemoryAccessor::new("employees"))
//! );
//!
//! // Get the router to compose with other axum routes
//! let app = optibridge::router(bridge.clone());
//!
//! // Or serve directly
//! optibridge::serve(bridge, "127.0.0.1:3000").await?;
//! ```

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::bridge::QueryBridge;
use super::envelope::Call;

/// Build an axum `Router` that dispatches call envelopes via the bridge.
pub fn router(bridge: Arc<QueryBridge>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/invoke", post(invoke_handler))
        .route("/batch", post(batch_handler))
        .with_state(bridge)
}

/// Serve the bridge over HTTP at the given address (e.g. `"127.0.0.1:3000"`).
pub async fn serve(bridge: Arc<QueryBridge>, addr: &str) -> Result<(), std::io::Error> {
    let app = router(bridge);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// `GET /health` — returns `{ "ok": true, "resources": [...] }`.
async fn health_handler(State(bridge): State<Arc<QueryBridge>>) -> impl IntoResponse {
    let resources: Vec<&str> = bridge.resources();
    Json(json!({ "ok": true, "resources": resources }))
}

/// `POST /invoke` — dispatch a single call envelope.
async fn invoke_handler(
    State(bridge): State<Arc<QueryBridge>>,
    Json(call): Json<Call>,
) -> impl IntoResponse {
    let outcome = bridge.dispatch(&call);
    let status =
        StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(outcome.body)).into_response()
}

/// `POST /batch` — dispatch envelopes sequentially with an all-or-nothing
/// response; completed results are discarded on failure.
async fn batch_handler(
    State(bridge): State<Arc<QueryBridge>>,
    Json(calls): Json<Vec<Call>>,
) -> impl IntoResponse {
    match bridge.invoke_many(&calls) {
        Ok(results) => (StatusCode::OK, Json(Value::Array(results))).into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = json!({ "error": e.to_string() });
            (status, Json(body)).into_response()
        }
    }
}
