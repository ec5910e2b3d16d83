pub mod catalog;
pub mod messages;

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

use crate::client::MessagingClient;
use crate::events::Notifier;
use crate::types::{Envelope, HealthResponse};

pub struct AppState {
    pub client: Arc<dyn MessagingClient>,
    pub notifier: Notifier,
    pub upload_dir: PathBuf,
    pub api_key: Option<String>,
}

fn success(response: Value) -> impl IntoResponse {
    (StatusCode::CREATED, Json(Envelope::success(response)))
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
