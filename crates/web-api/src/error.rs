use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nexus_registry::StoreError;
use nexus_relay::RelayError;
use serde_json::json;

/// Error shape shared by every handler: a status code and an `{"error"}`
/// JSON body. Handler failures never escape as panics.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::BotNotFound(_) => Self::not_found(err.to_string()),
            RelayError::MissingPair(_) | RelayError::InvalidCommand(_) => {
                Self::bad_request(err.to_string())
            }
            RelayError::Storage(inner) => inner.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidUpdate { .. } => Self::bad_request(err.to_string()),
            other => {
                tracing::error!("Registry failure: {other}");
                Self::internal("Storage unavailable")
            }
        }
    }
}
