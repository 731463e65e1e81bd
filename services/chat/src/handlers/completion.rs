use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ChatServiceError;
use crate::state::AppState;
use crate::usecase::completion::{SendCompletionOtpUseCase, VerifyCompletionOtpUseCase};

// ── POST /assignments/{id}/completion-otp ────────────────────────────────────

pub async fn send_completion_otp(
    State(state): State<AppState>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<Value>, ChatServiceError> {
    let usecase = SendCompletionOtpUseCase {
        directory: state.user_directory(),
        mailer: state.mailer.clone(),
        ledger: Arc::clone(&state.otp),
    };
    usecase.execute(assignment_id).await?;
    Ok(Json(json!({ "message": "OTP sent" })))
}

// ── POST /assignments/{id}/verify-otp ────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCompletionRequest {
    pub otp: Option<String>,
}

/// This endpoint's contract predates the service's `{kind, message}` error
/// shape: callers branch on `valid`, so every failure kind maps to
/// `{valid: false, message}` with a 400 (internal errors stay 500).
pub async fn verify_completion_otp(
    State(state): State<AppState>,
    Path(assignment_id): Path<i64>,
    Json(body): Json<VerifyCompletionRequest>,
) -> Response {
    let usecase = VerifyCompletionOtpUseCase {
        ledger: Arc::clone(&state.otp),
    };
    let result = match body.otp {
        None => Err(ChatServiceError::OtpRequired),
        Some(otp) => usecase.execute(assignment_id, &otp),
    };
    match result {
        Ok(()) => Json(json!({ "valid": true })).into_response(),
        Err(e @ ChatServiceError::Internal(_)) => e.into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "valid": false, "message": e.to_string() })),
        )
            .into_response(),
    }
}
