//! Response shapes for the public endpoints.
//!
//! # Design Decisions
//! - Every registration failure is a 500 with `{"error": "<message>"}`
//! - `/log` always answers 200; the outcome is in `status`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::registration::{RegistrationError, RegistrationOutcome};

/// Body of a successful registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub tx_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<RegistrationOutcome> for RegisterResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        Self {
            tx_hash: outcome.tx_hash.to_string(),
            warning: outcome.warning,
        }
    }
}

/// Body of a `/log` response.
#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub status: &'static str,
}

impl LogResponse {
    pub fn from_result<E>(result: &Result<(), E>) -> Self {
        Self {
            status: if result.is_ok() { "logged" } else { "failed" },
        }
    }
}

/// Error returned to HTTP clients.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}
