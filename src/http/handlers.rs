//! Endpoint handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::http::response::{ApiError, LogResponse, RegisterResponse};
use crate::http::server::AppState;
use crate::registration::RegistrationRequest;

/// `POST /register-collectible`
///
/// The submission runs on its own task. A dropped connection or a slow
/// client cannot cancel it between broadcast and log write.
pub async fn register_collectible(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let body = body.map_err(|e| ApiError::internal(format!("Unreadable request body: {}", e)))?;
    let request: RegistrationRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::internal(format!("Invalid JSON body: {}", e)))?;

    let registrar = Arc::clone(&state.registrar);
    let outcome = tokio::spawn(async move { registrar.submit(request).await })
        .await
        .map_err(|e| ApiError::internal(format!("Registration task failed: {}", e)))??;
    Ok(Json(outcome.into()))
}

/// `POST /log`
///
/// Always 200; a body that is unreadable or not a JSON object, or a failed
/// write, yields `{"status": "failed"}`.
pub async fn log_activity(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Json<LogResponse> {
    let parsed = body
        .map_err(|e| e.body_text())
        .and_then(|body| serde_json::from_slice::<serde_json::Value>(&body).map_err(|e| e.to_string()));

    let result = match parsed {
        Ok(value) => state.activity.append_value(value).await.map_err(|e| e.to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Activity record rejected");
            Err(e)
        }
    };
    Json(LogResponse::from_result(&result))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub signer: String,
    pub chain_id: u64,
    pub chain_reachable: bool,
}

/// `GET /health`
///
/// Always 200; `status` is `degraded` when the chain node does not answer.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let chain_reachable = state.registrar.chain_healthy().await;
    Json(HealthStatus {
        status: if chain_reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        signer: state.registrar.sender().to_string(),
        chain_id: state.registrar.chain_id(),
        chain_reachable,
    })
}
