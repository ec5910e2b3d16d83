//! Test doubles and request helpers shared by the handler tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::client::{Command, MessagingClient};
use crate::events::Notifier;
use crate::handlers::AppState;

#[derive(Default)]
enum Failure {
    #[default]
    Never,
    Recipient(String),
    Always,
}

#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Command>>,
    failure: Failure,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects the command addressed to `recipient`.
    pub fn failing_on(recipient: &str) -> Self {
        Self {
            failure: Failure::Recipient(recipient.to_string()),
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            failure: Failure::Always,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Command> {
        self.calls.lock().unwrap().clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|c| c.recipient().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl MessagingClient for RecordingClient {
    async fn execute(&self, command: Command) -> anyhow::Result<Value> {
        let recipient = command.recipient().map(str::to_string);
        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(command);
            calls.len()
        };

        let rejected = match &self.failure {
            Failure::Never => false,
            Failure::Recipient(target) => recipient.as_deref() == Some(target.as_str()),
            Failure::Always => true,
        };
        if rejected {
            anyhow::bail!("session dropped (call #{})", count);
        }

        Ok(json!({ "id": format!("msg-{}", count), "to": recipient }))
    }
}

pub fn app(client: Arc<RecordingClient>, upload_dir: &Path) -> (Router, Notifier) {
    let notifier = Notifier::new(16);
    let state = Arc::new(AppState {
        client,
        notifier: notifier.clone(),
        upload_dir: upload_dir.to_path_buf(),
        api_key: None,
    });
    (crate::router(state, 1024 * 1024), notifier)
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A POST without any content type, the way curl sends `-d` bodies.
pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri).body(Body::from(body.to_string())).unwrap()
}

pub fn multipart(uri: &str, fields: &[(&str, &str)], file: (&str, &[u8])) -> Request<Body> {
    const BOUNDARY: &str = "wpp-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    let (file_name, contents) = file;
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
