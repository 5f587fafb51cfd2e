use serde::Serialize;
use utoipa::ToSchema;

/// Trait for getting the wire name of an event
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// Error codes carried by outbound `error` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The offending frame was not a readable envelope.
    BadEvent,
    /// The envelope named a kind the hub does not handle.
    UnknownType,
    /// A message frame decoded but could not be persisted.
    SaveFailed,
}

/// Outbound frames, serialized as `{"type": "<kind>", "data": {...}}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    #[serde(rename = "message")]
    Message {
        conversation_id: String,
        sender_id: String,
        body: String,
        /// Unix seconds of the persisted row.
        created_at: i64,
    },
    #[serde(rename = "typing")]
    Typing {
        conversation_id: String,
        user_id: String,
        is_typing: bool,
    },
    #[serde(rename = "presence")]
    Presence {
        user_id: String,
        online: bool,
        /// Unix seconds of the last transition to offline, 0 for users
        /// never seen.
        last_seen: i64,
    },
    #[serde(rename = "error")]
    Error { error: ErrorCode },
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::Message { .. } => "message",
            Event::Typing { .. } => "typing",
            Event::Presence { .. } => "presence",
            Event::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_event_wire_shape() {
        let event = Event::Message {
            conversation_id: "c1".to_string(),
            sender_id: "u1".to_string(),
            body: "hello".to_string(),
            created_at: 1714000000,
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "message",
                "data": {
                    "conversation_id": "c1",
                    "sender_id": "u1",
                    "body": "hello",
                    "created_at": 1714000000,
                }
            })
        );
    }

    #[test]
    fn typing_event_wire_shape() {
        let event = Event::Typing {
            conversation_id: "c1".to_string(),
            user_id: "u1".to_string(),
            is_typing: false,
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "typing",
                "data": {
                    "conversation_id": "c1",
                    "user_id": "u1",
                    "is_typing": false,
                }
            })
        );
    }

    #[test]
    fn presence_event_wire_shape() {
        let event = Event::Presence {
            user_id: "u1".to_string(),
            online: true,
            last_seen: 0,
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "presence",
                "data": {
                    "user_id": "u1",
                    "online": true,
                    "last_seen": 0,
                }
            })
        );
    }

    #[test]
    fn error_codes_render_snake_case() {
        let event = Event::Error {
            error: ErrorCode::BadEvent,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "error", "data": {"error": "bad_event"}})
        );

        assert_eq!(
            serde_json::to_value(ErrorCode::UnknownType).unwrap(),
            json!("unknown_type")
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::SaveFailed).unwrap(),
            json!("save_failed")
        );
    }

    #[test]
    fn event_types_match_wire_names() {
        let message = Event::Message {
            conversation_id: String::new(),
            sender_id: String::new(),
            body: String::new(),
            created_at: 0,
        };
        assert_eq!(message.event_type(), "message");

        let error = Event::Error {
            error: ErrorCode::SaveFailed,
        };
        assert_eq!(error.event_type(), "error");
    }
}
