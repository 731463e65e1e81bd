use tracing::warn;

use crate::domain::repository::ParticipantStore;
use crate::domain::types::{ClosedReason, ParticipantRole};

/// Outcome of a participant check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    Denied(ClosedReason),
}

/// The participant authorization oracle. Re-run on every join and every
/// message — assignment and completion state can change mid-conversation, so
/// nothing here is cached.
pub struct AuthorizeParticipantUseCase<P: ParticipantStore> {
    pub store: P,
}

impl<P: ParticipantStore> AuthorizeParticipantUseCase<P> {
    /// Never errors: any store failure is treated as a denial (fail-closed).
    pub async fn execute(
        &self,
        request_id: i64,
        user_id: i64,
        role: ParticipantRole,
    ) -> Authorization {
        // 1. Completed requests reject everyone, legitimate participants included.
        match self.store.is_request_completed(request_id).await {
            Ok(true) => return Authorization::Denied(ClosedReason::Completed),
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, request_id, "completion check failed; denying");
                return Authorization::Denied(ClosedReason::Unauthorized);
            }
        }

        // 2. Role-specific participation lookup.
        match self.store.is_participant(request_id, user_id, role).await {
            Ok(true) => Authorization::Allowed,
            Ok(false) => Authorization::Denied(ClosedReason::Unauthorized),
            Err(e) => {
                warn!(error = %e, request_id, user_id, "participant check failed; denying");
                Authorization::Denied(ClosedReason::Unauthorized)
            }
        }
    }
}
