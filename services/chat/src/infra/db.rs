use anyhow::Context as _;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use taskops_chat_schema::{assignments, customers, employees, requests, users};

use crate::domain::repository::{ParticipantStore, UserDirectory};
use crate::domain::types::{COMPLETED_STATUS, ParticipantRole};
use crate::error::ChatServiceError;

// ── Participant store ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbParticipantStore {
    pub db: DatabaseConnection,
}

impl ParticipantStore for DbParticipantStore {
    async fn is_request_completed(&self, request_id: i64) -> Result<bool, ChatServiceError> {
        let request = requests::Entity::find_by_id(request_id)
            .one(&self.db)
            .await
            .context("load request status")?;
        Ok(request.is_some_and(|r| r.status == COMPLETED_STATUS))
    }

    async fn is_participant(
        &self,
        request_id: i64,
        user_id: i64,
        role: ParticipantRole,
    ) -> Result<bool, ChatServiceError> {
        use sea_orm::PaginatorTrait;
        let count = match role {
            ParticipantRole::Customer => requests::Entity::find()
                .filter(requests::Column::RequestId.eq(request_id))
                .inner_join(customers::Entity)
                .filter(customers::Column::UserId.eq(user_id))
                .count(&self.db)
                .await
                .context("match request to owning customer")?,
            ParticipantRole::Employee => assignments::Entity::find()
                .filter(assignments::Column::RequestId.eq(request_id))
                .inner_join(employees::Entity)
                .filter(employees::Column::UserId.eq(user_id))
                .count(&self.db)
                .await
                .context("match request to assigned employee")?,
        };
        Ok(count > 0)
    }
}

// ── User directory ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserDirectory {
    pub db: DatabaseConnection,
}

impl UserDirectory for DbUserDirectory {
    async fn email_exists(&self, email: &str) -> Result<bool, ChatServiceError> {
        use sea_orm::PaginatorTrait;
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await
            .context("count users by email")?;
        Ok(count > 0)
    }

    async fn customer_email_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<String>, ChatServiceError> {
        let Some(assignment) = assignments::Entity::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .context("load assignment")?
        else {
            return Ok(None);
        };
        let Some(request) = requests::Entity::find_by_id(assignment.request_id)
            .one(&self.db)
            .await
            .context("load request for assignment")?
        else {
            return Ok(None);
        };
        let customer = customers::Entity::find_by_id(request.customer_id)
            .one(&self.db)
            .await
            .context("load customer for request")?;
        Ok(customer.map(|c| c.email))
    }
}
