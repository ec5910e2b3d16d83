use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use thiserror::Error;

use crate::types::Envelope;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NothingSent(&'static str),

    #[error("Invalid request: {0}")]
    Malformed(String),

    #[error("{message}: {source:#}")]
    Client {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn missing(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn client(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Client {
            message,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNAUTHORIZED,
            Self::NothingSent(_) | Self::Malformed(_) => StatusCode::BAD_REQUEST,
            Self::Client { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(message) => message,
            Self::NothingSent(message) => message.to_string(),
            Self::Malformed(detail) => format!("Invalid request: {}", detail),
            Self::Client { message, source } => {
                error!("{}: {:#}", message, source);
                message.to_string()
            }
        };

        (status, Json(Envelope::error(message))).into_response()
    }
}

macro_rules! malformed_from {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    Self::Malformed(rejection.body_text())
                }
            }
        )+
    };
}

malformed_from!(BytesRejection, QueryRejection, MultipartRejection, MultipartError);

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

pub trait OrReport<T> {
    fn or_report(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T, E> OrReport<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn or_report(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::client(message, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_unauthorized() {
        let response = ApiError::missing("id was not informed").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "id was not informed");
    }

    #[tokio::test]
    async fn nothing_sent_maps_to_bad_request() {
        let response = ApiError::NothingSent("Error sending message").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request_envelope() {
        let err: ApiError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request:"));
    }

    #[tokio::test]
    async fn client_failure_hides_detail() {
        let failed: Result<(), anyhow::Error> = Err(anyhow::anyhow!("socket reset by peer"));
        let response = failed
            .or_report("Error on get products")
            .unwrap_err()
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Error on get products");
        assert!(!body.to_string().contains("socket reset"));
    }
}
