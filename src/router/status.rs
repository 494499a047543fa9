//! Liveness and metrics endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::{AppState, Configuration};

/// Structured status.
#[derive(Debug, Serialize, Deserialize)]
pub struct Status {
    status: String,
    name: String,
    version: String,
}

/// Public server status.
pub async fn health(State(config): State<Arc<Configuration>>) -> Json<Status> {
    Json(Status {
        status: "ok".into(),
        name: config.name.clone(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Prometheus exposition, when a recorder is installed.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;

    use super::*;
    use crate::*;

    #[tokio::test]
    async fn test_health_handler() {
        let app = app(test_state());
        let response = make_request(
            app,
            Method::GET,
            "/health",
            String::default(),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let status: Status = json_body(response).await;
        assert_eq!(status.status, "ok");
        assert_eq!(status.name, "dhakacart");
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        let app = app(test_state());
        let response = make_request(
            app,
            Method::GET,
            "/metrics",
            String::default(),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
