use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use muse::Muse;
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// State shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub muse: Muse,
    pub inference_configured: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Generated {
    status: &'static str,
    result: String,
    chars_generated: usize,
    processing_time: u64,
}

#[derive(Serialize)]
struct Failure {
    error: String,
    details: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    inference_configured: bool,
}

/// Name used in the failure envelope: the caller's raw `action`, or `Action`.
fn action_label(body: &Value) -> String {
    body.get("action")
        .and_then(Value::as_str)
        .filter(|a| !a.is_empty())
        .unwrap_or("Action")
        .to_string()
}

/// Run the action named in the body and wrap the outcome.
pub async fn devil_pov(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let started = Instant::now();
    let label = action_label(&body);
    match state.muse.handle(body).await {
        Ok(result) => {
            let processing_time = started.elapsed().as_millis() as u64;
            // Length as the browser counts it.
            let chars_generated = result.encode_utf16().count();
            info!(action = %label, chars_generated, processing_time, "generation complete");
            Json(Generated {
                status: "success",
                result,
                chars_generated,
                processing_time,
            })
            .into_response()
        }
        Err(err) => {
            error!(action = %label, %err, "action failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Failure {
                    error: format!("{label} failed"),
                    details: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(Health {
        status: "ok",
        inference_configured: state.inference_configured,
    })
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/devil-pov", post(devil_pov))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
