use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tokio::sync::broadcast;

use crate::domain::types::{ChatMessage, ClosedReason, ROOM_HISTORY_CAP};

/// Fan-out capacity per room. A subscriber that lags this far behind skips
/// ahead (broadcast `Lagged`) rather than blocking the room.
const ROOM_CHANNEL_CAPACITY: usize = 64;

/// Event delivered to every subscriber of a room.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    Message(ChatMessage),
    Closed { reason: ClosedReason },
}

struct Room {
    history: VecDeque<ChatMessage>,
    tx: broadcast::Sender<RoomEvent>,
}

impl Room {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(ROOM_CHANNEL_CAPACITY);
        Self {
            history: VecDeque::new(),
            tx,
        }
    }
}

/// In-memory registry of chat rooms keyed by request id.
///
/// Rooms are created lazily and live for the process lifetime. One mutex
/// guards the whole map, so snapshot-then-subscribe and trim-then-append are
/// atomic with respect to every other room operation; per-room message order
/// is the order appends acquire the lock.
pub struct ChatRooms {
    rooms: Mutex<HashMap<i64, Room>>,
}

impl ChatRooms {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Current message log for a room, oldest first. Empty if the room does
    /// not exist yet; does not create it.
    pub fn history(&self, request_id: i64) -> Vec<ChatMessage> {
        let rooms = self.rooms.lock().unwrap();
        rooms
            .get(&request_id)
            .map(|room| room.history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Subscribe to a room's events, returning the history snapshot taken
    /// under the same lock so no message can fall between snapshot and
    /// subscription. Creates the room if needed.
    pub fn subscribe(&self, request_id: i64) -> (Vec<ChatMessage>, broadcast::Receiver<RoomEvent>) {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.entry(request_id).or_insert_with(Room::new);
        let history = room.history.iter().cloned().collect();
        (history, room.tx.subscribe())
    }

    /// Append a message to a room's log, evicting the oldest entries past the
    /// cap, and broadcast it to every subscriber.
    pub fn append(&self, request_id: i64, message: ChatMessage) {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.entry(request_id).or_insert_with(Room::new);
        room.history.push_back(message.clone());
        while room.history.len() > ROOM_HISTORY_CAP {
            room.history.pop_front();
        }
        // Send fails only when nobody is subscribed; the log is still the
        // source of truth for late joiners.
        let _ = room.tx.send(RoomEvent::Message(message));
    }

    /// Broadcast a closed notice to every subscriber of a room. The log is
    /// left untouched.
    pub fn close(&self, request_id: i64, reason: ClosedReason) {
        let rooms = self.rooms.lock().unwrap();
        if let Some(room) = rooms.get(&request_id) {
            let _ = room.tx.send(RoomEvent::Closed { reason });
        }
    }
}

impl Default for ChatRooms {
    fn default() -> Self {
        Self::new()
    }
}
