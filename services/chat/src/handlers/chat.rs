use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::rooms::RoomEvent;
use crate::domain::types::{ChatMessage, ClosedReason};
use crate::state::AppState;
use crate::usecase::chat::{
    JoinChatInput, JoinChatUseCase, JoinOutcome, PostMessageInput, PostMessageUseCase, PostOutcome,
};

/// Outbound queue depth per connection before backpressure on the forwarders.
const OUTBOUND_QUEUE: usize = 64;

/// Frames a client may send. Unknown events and frames that fail to decode
/// are dropped without a reply (permissive no-op, mirrored by the usecases'
/// `Ignored` outcomes for missing fields).
#[derive(Debug, Deserialize)]
#[serde(tag = "event")]
enum ClientEvent {
    #[serde(rename = "join", rename_all = "camelCase")]
    Join {
        request_id: Option<i64>,
        user_id: Option<i64>,
        user_type: Option<String>,
        name: Option<String>,
    },
    #[serde(rename = "message", rename_all = "camelCase")]
    Message {
        request_id: Option<i64>,
        text: Option<String>,
        user_id: Option<i64>,
        user_type: Option<String>,
        name: Option<String>,
        ts: Option<i64>,
    },
}

/// Frames the server emits. `history` goes to the joining connection only;
/// `message` and room-wide `chatClosed` fan out through the room channel.
#[derive(Debug, Serialize)]
#[serde(tag = "event")]
enum ServerEvent {
    #[serde(rename = "history")]
    History { messages: Vec<ChatMessage> },
    #[serde(rename = "message")]
    Message(ChatMessage),
    #[serde(rename = "chatClosed")]
    ChatClosed { reason: ClosedReason },
}

impl From<RoomEvent> for ServerEvent {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::Message(msg) => Self::Message(msg),
            RoomEvent::Closed { reason } => Self::ChatClosed { reason },
        }
    }
}

// ── GET /ws ──────────────────────────────────────────────────────────────────

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-connection event loop. States: connected (no rooms) → joined (one or
/// more rooms; joins are additive) → disconnected. Each inbound frame is
/// handled to completion, authorization round-trip included, before the next
/// frame for this connection is read.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<ServerEvent>(OUTBOUND_QUEUE);

    // Single writer owns the sink; the event loop and every room forwarder
    // feed it through the channel.
    let writer: JoinHandle<()> = tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if sink.send(WsMessage::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut joined: HashSet<i64> = HashSet::new();
    let mut forwarders: Vec<JoinHandle<()>> = Vec::new();

    while let Some(Ok(frame)) = stream.next().await {
        let WsMessage::Text(text) = frame else {
            continue;
        };
        let Ok(event) = serde_json::from_str::<ClientEvent>(&text) else {
            debug!("dropping undecodable chat frame");
            continue;
        };

        match event {
            ClientEvent::Join {
                request_id,
                user_id,
                user_type,
                name,
            } => {
                let usecase = JoinChatUseCase {
                    store: state.participant_store(),
                    rooms: Arc::clone(&state.rooms),
                };
                let outcome = usecase
                    .execute(JoinChatInput {
                        request_id,
                        user_id,
                        user_type,
                        name,
                    })
                    .await;
                match outcome {
                    JoinOutcome::Ignored => {}
                    JoinOutcome::Refused(reason) => {
                        let _ = out_tx.send(ServerEvent::ChatClosed { reason }).await;
                    }
                    JoinOutcome::Joined {
                        request_id,
                        history,
                        events,
                    } => {
                        let _ = out_tx.send(ServerEvent::History { messages: history }).await;
                        // Re-joining the same room refreshes history but must
                        // not double-subscribe.
                        if joined.insert(request_id) {
                            forwarders.push(spawn_room_forwarder(events, out_tx.clone()));
                        }
                    }
                }
            }
            ClientEvent::Message {
                request_id,
                text,
                user_id,
                user_type,
                name,
                ts,
            } => {
                let usecase = PostMessageUseCase {
                    store: state.participant_store(),
                    rooms: Arc::clone(&state.rooms),
                };
                let outcome = usecase
                    .execute(PostMessageInput {
                        request_id,
                        text,
                        user_id,
                        user_type,
                        name,
                        ts,
                    })
                    .await;
                match outcome {
                    // Sender-only rejection; room members are unaffected.
                    PostOutcome::Refused(reason) => {
                        let _ = out_tx.send(ServerEvent::ChatClosed { reason }).await;
                    }
                    // Posted and RoomClosed reach this connection through its
                    // room subscription like everyone else's.
                    PostOutcome::Ignored | PostOutcome::RoomClosed | PostOutcome::Posted => {}
                }
            }
        }
    }

    // Disconnect: drop the room subscriptions and let the writer drain.
    for task in &forwarders {
        task.abort();
    }
    drop(out_tx);
    let _ = writer.await;
}

fn spawn_room_forwarder(
    mut events: broadcast::Receiver<RoomEvent>,
    out: mpsc::Sender<ServerEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if out.send(event.into()).await.is_err() {
                        break;
                    }
                }
                // Skipped ahead after falling behind; history still has the
                // capped log for anyone who re-joins.
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "chat subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
