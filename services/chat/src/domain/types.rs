use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a request a chat participant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Customer,
    Employee,
}

impl ParticipantRole {
    /// Parse the wire `userType` value. Anything but the two known roles is
    /// `None` — and never authorized.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(Self::Customer),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }
}

/// Why a join or message was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosedReason {
    Completed,
    Unauthorized,
}

/// One chat message, immutable once appended to a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender_id: i64,
    pub sender_type: ParticipantRole,
    pub name: String,
    pub text: String,
    #[serde(with = "taskops_core::serde::epoch_ms")]
    pub ts: DateTime<Utc>,
}

/// Per-identity OTP record held by the ledger.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
}

/// Signup verification OTP time-to-live in seconds.
pub const SIGNUP_OTP_TTL_SECS: i64 = 5 * 60;

/// Assignment-completion confirmation OTP time-to-live in seconds.
pub const COMPLETION_OTP_TTL_SECS: i64 = 10 * 60;

/// Maximum retained messages per room; oldest entries are evicted first.
pub const ROOM_HISTORY_CAP: usize = 200;

/// Request status value the chat service treats as terminal.
pub const COMPLETED_STATUS: &str = "Completed";
