use std::sync::Arc;

use chrono::Duration;

use crate::domain::otp::OtpLedger;
use crate::domain::repository::{Mailer, UserDirectory};
use crate::domain::types::SIGNUP_OTP_TTL_SECS;
use crate::error::ChatServiceError;

/// Email body for a verification code, matching the frontend's rendering
/// expectations (large letter-spaced code plus expiry note).
pub fn otp_email_html(code: &str, expires_note: &str) -> String {
    format!(
        "<div>\n  <p>Your verification code is:</p>\n  \
         <h2 style=\"font-size:24px;letter-spacing:4px\">{code}</h2>\n  \
         <p>{expires_note}</p>\n</div>"
    )
}

// ── SendSignupOtp ────────────────────────────────────────────────────────────

pub struct SendSignupOtpInput {
    pub email: String,
}

pub struct SendSignupOtpUseCase<D, M>
where
    D: UserDirectory,
    M: Mailer,
{
    pub directory: D,
    pub mailer: M,
    pub ledger: Arc<OtpLedger>,
}

impl<D, M> SendSignupOtpUseCase<D, M>
where
    D: UserDirectory,
    M: Mailer,
{
    pub async fn execute(&self, input: SendSignupOtpInput) -> Result<(), ChatServiceError> {
        // 1. Block emails that already have an account → 409.
        if self.directory.email_exists(&input.email).await? {
            return Err(ChatServiceError::EmailInUse);
        }

        // 2. Issue a fresh code (supersedes any earlier one for this email).
        let code = self
            .ledger
            .issue(&input.email, Duration::seconds(SIGNUP_OTP_TTL_SECS));

        // 3. Dispatch the email. A failed signup send is surfaced — the
        //    caller has nothing to show the user otherwise.
        let html = otp_email_html(&code, "This code will expire in 5 minutes.");
        self.mailer
            .send(&input.email, "Your OTP Code", &html)
            .await?;
        Ok(())
    }
}

// ── VerifySignupOtp ──────────────────────────────────────────────────────────

pub struct VerifySignupOtpInput {
    pub email: String,
    pub otp: String,
}

pub struct VerifySignupOtpUseCase {
    pub ledger: Arc<OtpLedger>,
}

impl VerifySignupOtpUseCase {
    pub fn execute(&self, input: VerifySignupOtpInput) -> Result<(), ChatServiceError> {
        self.ledger.verify(&input.email, &input.otp)?;
        Ok(())
    }
}

// ── CheckEmailVerified ───────────────────────────────────────────────────────

/// Gate for account creation: was this email successfully verified and is
/// that verification still inside the code's validity window?
pub struct CheckEmailVerifiedUseCase {
    pub ledger: Arc<OtpLedger>,
}

impl CheckEmailVerifiedUseCase {
    pub fn execute(&self, email: &str) -> bool {
        self.ledger.is_verified_recently(email)
    }
}
