use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::otp::OtpLedger;
use crate::domain::rooms::ChatRooms;
use crate::infra::db::{DbParticipantStore, DbUserDirectory};
use crate::infra::mail::MailjetMailer;

/// Shared application state passed to every handler via axum `State`.
///
/// The ledger and the room registry are the two pieces of owned in-process
/// state; both are constructed once at startup and live for the process.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: MailjetMailer,
    pub otp: Arc<OtpLedger>,
    pub rooms: Arc<ChatRooms>,
}

impl AppState {
    pub fn participant_store(&self) -> DbParticipantStore {
        DbParticipantStore {
            db: self.db.clone(),
        }
    }

    pub fn user_directory(&self) -> DbUserDirectory {
        DbUserDirectory {
            db: self.db.clone(),
        }
    }
}
