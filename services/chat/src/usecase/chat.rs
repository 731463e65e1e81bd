use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::domain::repository::ParticipantStore;
use crate::domain::rooms::{ChatRooms, RoomEvent};
use crate::domain::types::{ChatMessage, ClosedReason, ParticipantRole};
use crate::usecase::authorize::{Authorization, AuthorizeParticipantUseCase};

// ── JoinChat ─────────────────────────────────────────────────────────────────

/// Raw fields from a `join` frame. Everything is optional until validated.
pub struct JoinChatInput {
    pub request_id: Option<i64>,
    pub user_id: Option<i64>,
    pub user_type: Option<String>,
    pub name: Option<String>,
}

pub enum JoinOutcome {
    /// Malformed frame (missing field): explicit no-op, nothing emitted.
    Ignored,
    /// Emit `chatClosed{reason}` to the requesting connection only.
    Refused(ClosedReason),
    /// Connection is now a room member; send it the history snapshot.
    Joined {
        request_id: i64,
        history: Vec<ChatMessage>,
        events: broadcast::Receiver<RoomEvent>,
    },
}

pub struct JoinChatUseCase<P: ParticipantStore> {
    pub store: P,
    pub rooms: Arc<ChatRooms>,
}

impl<P: ParticipantStore> JoinChatUseCase<P> {
    pub async fn execute(self, input: JoinChatInput) -> JoinOutcome {
        // All four fields must be present; otherwise drop the frame.
        let (Some(request_id), Some(user_id), Some(user_type), Some(_name)) = (
            input.request_id,
            input.user_id,
            input.user_type.as_deref(),
            input.name.as_deref(),
        ) else {
            return JoinOutcome::Ignored;
        };

        // Unknown role values are never authorized; refuse before touching
        // the store.
        let Some(role) = ParticipantRole::parse(user_type) else {
            return JoinOutcome::Refused(ClosedReason::Unauthorized);
        };
        let oracle = AuthorizeParticipantUseCase { store: self.store };
        match oracle.execute(request_id, user_id, role).await {
            Authorization::Denied(reason) => JoinOutcome::Refused(reason),
            Authorization::Allowed => {
                let (history, events) = self.rooms.subscribe(request_id);
                JoinOutcome::Joined {
                    request_id,
                    history,
                    events,
                }
            }
        }
    }
}

// ── PostMessage ──────────────────────────────────────────────────────────────

/// Raw fields from a `message` frame.
pub struct PostMessageInput {
    pub request_id: Option<i64>,
    pub text: Option<String>,
    pub user_id: Option<i64>,
    pub user_type: Option<String>,
    pub name: Option<String>,
    /// Client-supplied timestamp in epoch milliseconds; server time if absent.
    pub ts: Option<i64>,
}

pub enum PostOutcome {
    /// Malformed frame or empty text after trimming: no-op.
    Ignored,
    /// Request turned terminal; `chatClosed{completed}` was broadcast to the
    /// whole room. The message was not appended.
    RoomClosed,
    /// Sender is not a participant; emit `chatClosed{unauthorized}` to the
    /// sender only.
    Refused(ClosedReason),
    /// Appended and broadcast to every subscriber.
    Posted,
}

pub struct PostMessageUseCase<P: ParticipantStore> {
    pub store: P,
    pub rooms: Arc<ChatRooms>,
}

impl<P: ParticipantStore> PostMessageUseCase<P> {
    pub async fn execute(self, input: PostMessageInput) -> PostOutcome {
        let (Some(request_id), Some(text), Some(user_id), Some(user_type), Some(name)) = (
            input.request_id,
            input.text.as_deref(),
            input.user_id,
            input.user_type.as_deref(),
            input.name.as_deref(),
        ) else {
            return PostOutcome::Ignored;
        };
        let text = text.trim();
        if text.is_empty() {
            return PostOutcome::Ignored;
        }

        // Unknown role values are never authorized.
        let Some(role) = ParticipantRole::parse(user_type) else {
            return PostOutcome::Refused(ClosedReason::Unauthorized);
        };

        // Re-authorize on every message: the request may have completed or
        // the assignment changed since the join.
        let oracle = AuthorizeParticipantUseCase { store: self.store };
        match oracle.execute(request_id, user_id, role).await {
            Authorization::Denied(ClosedReason::Completed) => {
                self.rooms.close(request_id, ClosedReason::Completed);
                PostOutcome::RoomClosed
            }
            Authorization::Denied(reason) => PostOutcome::Refused(reason),
            Authorization::Allowed => {
                let ts = input
                    .ts
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                    .unwrap_or_else(Utc::now);
                let message = ChatMessage {
                    sender_id: user_id,
                    sender_type: role,
                    name: name.to_owned(),
                    text: text.to_owned(),
                    ts,
                };
                self.rooms.append(request_id, message);
                PostOutcome::Posted
            }
        }
    }
}
