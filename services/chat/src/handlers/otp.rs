use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ChatServiceError;
use crate::state::AppState;
use crate::usecase::otp::{
    CheckEmailVerifiedUseCase, SendSignupOtpInput, SendSignupOtpUseCase, VerifySignupOtpInput,
    VerifySignupOtpUseCase,
};

// ── POST /otp/send ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: Option<String>,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<Json<Value>, ChatServiceError> {
    let email = body
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or(ChatServiceError::EmailRequired)?;
    let usecase = SendSignupOtpUseCase {
        directory: state.user_directory(),
        mailer: state.mailer.clone(),
        ledger: Arc::clone(&state.otp),
    };
    usecase.execute(SendSignupOtpInput { email }).await?;
    Ok(Json(json!({ "message": "OTP sent" })))
}

// ── POST /otp/verify ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<Value>, ChatServiceError> {
    let (Some(email), Some(otp)) = (body.email, body.otp) else {
        return Err(ChatServiceError::EmailAndOtpRequired);
    };
    let usecase = VerifySignupOtpUseCase {
        ledger: Arc::clone(&state.otp),
    };
    usecase.execute(VerifySignupOtpInput { email, otp })?;
    Ok(Json(json!({ "message": "OTP verified" })))
}

// ── GET /otp/verified ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifiedQuery {
    pub email: Option<String>,
}

/// Signup gate: has this email passed OTP verification and is that
/// verification still inside the code's validity window?
pub async fn verified_status(
    State(state): State<AppState>,
    Query(query): Query<VerifiedQuery>,
) -> Result<Json<Value>, ChatServiceError> {
    let email = query.email.ok_or(ChatServiceError::EmailRequired)?;
    let usecase = CheckEmailVerifiedUseCase {
        ledger: Arc::clone(&state.otp),
    };
    Ok(Json(json!({ "verified": usecase.execute(&email) })))
}
