use std::sync::Arc;

use chrono::Duration;
use tracing::error;

use crate::domain::otp::OtpLedger;
use crate::domain::repository::{Mailer, UserDirectory};
use crate::domain::types::COMPLETION_OTP_TTL_SECS;
use crate::error::ChatServiceError;
use crate::usecase::otp::otp_email_html;

/// Ledger key for an assignment-completion code. Prefixed so assignment ids
/// can never collide with email keys in the shared ledger.
pub fn completion_key(assignment_id: i64) -> String {
    format!("assignment:{assignment_id}")
}

// ── SendCompletionOtp ────────────────────────────────────────────────────────

pub struct SendCompletionOtpUseCase<D, M>
where
    D: UserDirectory,
    M: Mailer,
{
    pub directory: D,
    pub mailer: M,
    pub ledger: Arc<OtpLedger>,
}

impl<D, M> SendCompletionOtpUseCase<D, M>
where
    D: UserDirectory,
    M: Mailer,
{
    pub async fn execute(&self, assignment_id: i64) -> Result<(), ChatServiceError> {
        // 1. Resolve the customer email through assignment → request → customer.
        let email = self
            .directory
            .customer_email_for_assignment(assignment_id)
            .await?
            .ok_or(ChatServiceError::CustomerEmailNotFound)?;

        // 2. Issue the confirmation code keyed by the assignment.
        let code = self.ledger.issue(
            &completion_key(assignment_id),
            Duration::seconds(COMPLETION_OTP_TTL_SECS),
        );

        // 3. Email it. Delivery failures on the completion path are logged
        //    and swallowed; the code is live and the customer can be re-sent.
        let html = otp_email_html(&code, "This code will expire in 10 minutes.");
        if let Err(e) = self
            .mailer
            .send(&email, "Confirm your service completion", &html)
            .await
        {
            error!(error = %e, assignment_id, "completion OTP email failed");
        }
        Ok(())
    }
}

// ── VerifyCompletionOtp ──────────────────────────────────────────────────────

pub struct VerifyCompletionOtpUseCase {
    pub ledger: Arc<OtpLedger>,
}

impl VerifyCompletionOtpUseCase {
    pub fn execute(&self, assignment_id: i64, otp: &str) -> Result<(), ChatServiceError> {
        self.ledger.verify(&completion_key(assignment_id), otp)?;
        Ok(())
    }
}
