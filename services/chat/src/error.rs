use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::otp::OtpFailure;

/// Chat service domain error variants.
///
/// Display strings double as the user-facing `message` field, so they keep
/// the wording the frontend expects.
#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Email and OTP are required")]
    EmailAndOtpRequired,
    #[error("OTP is required")]
    OtpRequired,
    #[error("User with this email already exists")]
    EmailInUse,
    #[error("Invalid OTP. Please try again.")]
    InvalidOtp,
    #[error("OTP expired. Please request a new one.")]
    OtpExpired,
    #[error("OTP already used")]
    OtpAlreadyUsed,
    #[error("No customer email found for this assignment")]
    CustomerEmailNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ChatServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmailRequired => "EMAIL_REQUIRED",
            Self::EmailAndOtpRequired => "EMAIL_AND_OTP_REQUIRED",
            Self::OtpRequired => "OTP_REQUIRED",
            Self::EmailInUse => "EMAIL_IN_USE",
            Self::InvalidOtp => "INVALID_OTP",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::OtpAlreadyUsed => "OTP_ALREADY_USED",
            Self::CustomerEmailNotFound => "CUSTOMER_EMAIL_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<OtpFailure> for ChatServiceError {
    fn from(failure: OtpFailure) -> Self {
        match failure {
            // A missing record and a wrong code are indistinguishable to the
            // caller; both read as "Invalid OTP".
            OtpFailure::NotFound | OtpFailure::Mismatch => Self::InvalidOtp,
            OtpFailure::Expired => Self::OtpExpired,
            OtpFailure::AlreadyConsumed => Self::OtpAlreadyUsed,
        }
    }
}

impl IntoResponse for ChatServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::EmailRequired
            | Self::EmailAndOtpRequired
            | Self::OtpRequired
            | Self::InvalidOtp
            | Self::OtpExpired
            | Self::OtpAlreadyUsed => StatusCode::BAD_REQUEST,
            Self::EmailInUse => StatusCode::CONFLICT,
            Self::CustomerEmailNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors; only the internal chain gets logged.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
