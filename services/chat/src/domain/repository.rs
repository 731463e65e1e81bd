#![allow(async_fn_in_trait)]

use crate::domain::types::ParticipantRole;
use crate::error::ChatServiceError;

/// Port for the relational store the authorization oracle reads. The chat
/// service never writes through it; assignment and status changes happen in
/// the CRUD layer and are only observed here.
pub trait ParticipantStore: Send + Sync {
    /// Whether the request's status is terminal ("Completed"). Unknown
    /// request ids read as not completed; the participant check rejects them.
    async fn is_request_completed(&self, request_id: i64) -> Result<bool, ChatServiceError>;

    /// Whether `user_id` is a legitimate participant of the request in the
    /// given role: the owning customer, or an employee assigned to it.
    async fn is_participant(
        &self,
        request_id: i64,
        user_id: i64,
        role: ParticipantRole,
    ) -> Result<bool, ChatServiceError>;
}

/// Port for account/email lookups backing the OTP flows.
pub trait UserDirectory: Send + Sync {
    /// Whether an account already exists for this email (blocks signup OTP).
    async fn email_exists(&self, email: &str) -> Result<bool, ChatServiceError>;

    /// Resolve the customer email for an assignment by walking
    /// assignment → request → customer. `None` when any link is missing.
    async fn customer_email_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<String>, ChatServiceError>;
}

/// Port for outbound email delivery.
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ChatServiceError>;
}
